use anyhow::Result;
use log::{debug, warn};

use crate::domain::email::RenderedEmail;
use crate::mail::source::MessageSource;
use crate::mime::select_text;

/// Render up to `max_results` unread messages.
///
/// Failing to list is an error. A message that cannot be fetched or whose
/// text cannot be extracted is logged and left out; the rest of the batch
/// is still rendered.
pub fn list_unread_emails(source: &dyn MessageSource, max_results: u32) -> Result<Vec<RenderedEmail>> {
    let ids = source.list_unread(max_results)?;
    debug!("{} unread message(s) listed", ids.len());

    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        match render_message(source, &id) {
            Ok(email) => out.push(email),
            Err(e) => {
                warn!("skipping message {id}: {e:#}");
                continue;
            }
        }
    }
    Ok(out)
}

/// Fetch and render a single message.
pub fn render_message(source: &dyn MessageSource, id: &str) -> Result<RenderedEmail> {
    let msg = source.fetch(id)?;
    let body = select_text(&msg.payload)?;
    Ok(RenderedEmail::new(msg.id, body))
}
