use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use log::debug;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

const PARAGRAPH_BREAK: &str = "\n\n";

/// Render HTML markup as plain text.
///
/// The markup is parsed as an HTML5 document, so character references are
/// decoded and a stray `<` stays text. Text nodes are then copied in
/// document order without whitespace changes. Every `<p>` element emits a
/// blank line when it is entered, before its own text. All other elements
/// only contribute their children.
///
/// Markup the parser refuses yields an empty string, same as a document
/// with no text at all.
pub fn html_to_text(markup: &str) -> String {
    let dom = match parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut markup.as_bytes())
    {
        Ok(dom) => dom,
        Err(e) => {
            debug!("html parse failed, rendering as empty text: {e}");
            return String::new();
        }
    };

    // Depth-first pre-order walk over an explicit stack.
    let mut out = String::new();
    let mut stack: Vec<Handle> = vec![dom.document.clone()];

    while let Some(node) = stack.pop() {
        match &node.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { name, .. } if &*name.local == "p" => {
                out.push_str(PARAGRAPH_BREAK);
            }
            _ => {}
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_get_a_leading_blank_line() {
        assert_eq!(html_to_text("<p>A</p><p>B</p>"), "\n\nA\n\nB");
    }

    #[test]
    fn other_elements_are_transparent() {
        assert_eq!(html_to_text("<div>hello <b>world</b></div>"), "hello world");
    }

    #[test]
    fn paragraph_break_is_emitted_before_nested_text() {
        assert_eq!(
            html_to_text("<div>intro<p>one <i>two</i></p>outro</div>"),
            "intro\n\none twooutro"
        );
    }

    #[test]
    fn character_references_are_decoded() {
        assert_eq!(
            html_to_text("<p>Tom &amp; Jerry&nbsp;say &#39;hi&#39; &lt;3</p>"),
            "\n\nTom & Jerry\u{a0}say 'hi' <3"
        );
    }

    #[test]
    fn stray_angle_bracket_stays_text() {
        assert_eq!(html_to_text("<p>a < b and c</p>"), "\n\na < b and c");
        assert_eq!(html_to_text("<<<>>>"), "<<<>>>");
    }

    #[test]
    fn script_body_is_raw_text() {
        assert_eq!(html_to_text("<script>if (a<b) x()</script>z"), "if (a<b) x()z");
    }

    #[test]
    fn unclosed_paragraphs_still_break() {
        assert_eq!(html_to_text("<p>one<p>two"), "\n\none\n\ntwo");
    }

    #[test]
    fn uppercase_paragraph_tags_count() {
        assert_eq!(html_to_text("<P>x</P>"), "\n\nx");
    }

    #[test]
    fn whitespace_is_not_normalized() {
        assert_eq!(html_to_text("<span>  a\n\tb  </span>"), "  a\n\tb  ");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(html_to_text("just text"), "just text");
    }

    #[test]
    fn comments_emit_nothing() {
        assert_eq!(html_to_text("a<!-- hidden -->b"), "ab");
    }

    #[test]
    fn malformed_markup_never_fails() {
        for markup in ["<p><div></b", "<<<>>>", "</p>", "<p", "<a href='x>y</a>", ""] {
            let _ = html_to_text(markup);
        }
        assert_eq!(html_to_text(""), "");
    }

    #[test]
    fn same_input_same_output() {
        let markup = "<html><body><p>Hi</p><p>there <b>you</b></p></body></html>";
        assert_eq!(html_to_text(markup), html_to_text(markup));
    }
}
