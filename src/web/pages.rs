//! HTML for the local web pages. All dynamic text is escaped here.

use htmlescape::encode_minimal;
use std::fmt::Write as _;

use crate::domain::email::RenderedEmail;

const STYLE: &str = r#"
      body { font-family: Arial, sans-serif; background-color: #f4f4f4; padding: 20px; }
      .container { max-width: 600px; margin: 0 auto; background-color: #fff; border-radius: 8px;
                   box-shadow: 0 0 10px rgba(0, 0, 0, 0.1); padding: 20px; }
      h1 { color: #333; }
      ul { list-style-type: none; padding: 0; }
      li { margin-bottom: 10px; border-bottom: 1px solid #ddd; padding-bottom: 10px; }
      li:last-child { border-bottom: none; }
      pre { white-space: pre-wrap; }
"#;

fn layout(title: &str, content: &str) -> String {
    format!(
        "<html>\n  <head>\n    <title>{title}</title>\n    <style>{STYLE}</style>\n  </head>\n  <body>\n    <div class=\"container\">\n{content}    </div>\n  </body>\n</html>\n",
        title = encode_minimal(title),
    )
}

pub fn auth_page(authorize_url: &str) -> String {
    let content = format!(
        "      <h1>Authentication</h1>\n      <p>Click <a href=\"{}\">here</a> to authenticate.</p>\n",
        encode_minimal(authorize_url)
    );
    layout("Authentication", &content)
}

/// The unread list. `just_authenticated` adds the confirmation line shown
/// after the OAuth callback.
pub fn emails_page(emails: &[RenderedEmail], just_authenticated: bool) -> String {
    let mut content = String::new();
    if just_authenticated {
        content.push_str("      <h1>Authenticated</h1>\n      <p>Authenticated successfully.</p>\n");
    }
    content.push_str("      <h2>Unread emails</h2>\n");

    if emails.is_empty() {
        content.push_str("      <p>No unread emails.</p>\n");
    } else {
        content.push_str("      <ul>\n");
        for email in emails {
            let _ = write!(
                content,
                "        <li><strong>{}</strong> - {}",
                encode_minimal(&email.id),
                encode_minimal(&email.snippet)
            );
            if email.is_truncated() {
                let _ = write!(
                    content,
                    " <a href=\"/view-email/{}\">(more)</a>",
                    encode_minimal(&email.id)
                );
            }
            content.push_str("</li>\n");
        }
        content.push_str("      </ul>\n");
    }

    let title = if just_authenticated { "Authenticated" } else { "Unread emails" };
    layout(title, &content)
}

pub fn email_page(email: &RenderedEmail) -> String {
    let content = format!(
        "      <p><a href=\"/emails\">&larr; back</a></p>\n      <h2>{}</h2>\n      <pre>{}</pre>\n",
        encode_minimal(&email.id),
        encode_minimal(&email.body)
    );
    layout("Email", &content)
}

pub fn error_page(message: &str) -> String {
    let content = format!("      <h1>Error</h1>\n      <p>{}</p>\n", encode_minimal(message));
    layout("Error", &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_page_links_to_consent_url() {
        let html = auth_page("https://accounts.example/auth?a=1&b=2");
        assert!(html.contains("https://accounts.example/auth?a=1&amp;b=2"));
        assert!(html.contains("to authenticate."));
    }

    #[test]
    fn snippets_are_escaped() {
        let emails = vec![RenderedEmail::new("m1", "<script>alert(1)</script>".into())];
        let html = emails_page(&emails, false);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn more_link_only_for_truncated_snippets() {
        let emails = vec![
            RenderedEmail::new("long", "a".repeat(150)),
            RenderedEmail::new("short", "b".repeat(100)),
        ];
        let html = emails_page(&emails, true);
        assert!(html.contains("Authenticated successfully."));
        assert!(html.contains("/view-email/long"));
        assert!(!html.contains("/view-email/short"));
    }

    #[test]
    fn empty_list_says_so() {
        assert!(emails_page(&[], false).contains("No unread emails."));
    }

    #[test]
    fn email_page_shows_full_body() {
        let email = RenderedEmail::new("m9", format!("{}tail & end", "c".repeat(120)));
        let html = email_page(&email);
        assert!(html.contains("tail &amp; end"));
    }
}
