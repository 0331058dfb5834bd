pub type EmailId = String;

/// Preview length, counted in UTF-8 bytes.
pub const SNIPPET_LEN: usize = 100;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub id: EmailId,
    pub snippet: String,
    pub body: String,
}

impl RenderedEmail {
    pub fn new(id: impl Into<EmailId>, body: String) -> Self {
        Self {
            id: id.into(),
            snippet: snippet(&body),
            body,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.body.len() > SNIPPET_LEN
    }
}

/// First `SNIPPET_LEN` bytes of `body` plus "..." when it is longer.
///
/// The cut is made on the byte count, so a multi-byte character straddling
/// the boundary is split; the dangling half becomes U+FFFD.
pub fn snippet(body: &str) -> String {
    if body.len() <= SNIPPET_LEN {
        return body.to_string();
    }
    let mut s = String::from_utf8_lossy(&body.as_bytes()[..SNIPPET_LEN]).into_owned();
    s.push_str(ELLIPSIS);
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_body_is_cut_and_suffixed() {
        let body = "x".repeat(150);
        assert_eq!(snippet(&body), format!("{}...", "x".repeat(100)));
    }

    #[test]
    fn short_body_is_unchanged() {
        let body = "y".repeat(80);
        assert_eq!(snippet(&body), body);
    }

    #[test]
    fn boundary_is_strictly_greater_than() {
        let body = "z".repeat(100);
        assert_eq!(snippet(&body), body);
        let body = "z".repeat(101);
        assert_eq!(snippet(&body), format!("{}...", "z".repeat(100)));
    }

    #[test]
    fn multibyte_character_on_the_boundary_is_split() {
        // 1 + 60 * 2 bytes; byte 100 falls inside the 50th 'é'
        let body = format!("a{}", "é".repeat(60));
        let s = snippet(&body);
        assert_eq!(s, format!("a{}\u{fffd}...", "é".repeat(49)));
    }

    #[test]
    fn rendered_email_carries_snippet_and_body() {
        let email = RenderedEmail::new("m1", "w".repeat(120));
        assert_eq!(email.id, "m1");
        assert_eq!(email.body.len(), 120);
        assert!(email.snippet.ends_with("..."));
        assert!(email.is_truncated());
        assert!(!RenderedEmail::new("m2", "short".into()).is_truncated());
    }
}
