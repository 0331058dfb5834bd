use crate::error::ExtractionError;
use crate::mime::decoder::decode;
use crate::mime::html::html_to_text;
use crate::mime::part::MessagePart;

const TEXT_PLAIN: &str = "text/plain";
const TEXT_HTML: &str = "text/html";

/// Extract the displayable text of a message.
///
/// A `text/plain` or `text/html` part is rendered directly. Anything else is
/// treated as a container and its first direct child of either text type is
/// rendered instead. Children are taken in delivery order, so an html part
/// listed before its plain sibling wins.
pub fn select_text(part: &MessagePart) -> Result<String, ExtractionError> {
    if part.is_empty() {
        return Ok(String::new());
    }

    if let Some(text) = render_text_part(part)? {
        return Ok(text);
    }

    for child in &part.children {
        if let Some(text) = render_text_part(child)? {
            return Ok(text);
        }
    }

    Ok(String::new())
}

/// `None` when the part is not one of the text types.
fn render_text_part(part: &MessagePart) -> Result<Option<String>, ExtractionError> {
    let is_html = match part.media_type.as_str() {
        TEXT_PLAIN => false,
        TEXT_HTML => true,
        _ => return Ok(None),
    };

    let bytes = decode(part.body.as_deref().unwrap_or_default())?;
    let text = String::from_utf8_lossy(&bytes);
    if is_html {
        Ok(Some(html_to_text(&text)))
    } else {
        Ok(Some(text.into_owned()))
    }
}
