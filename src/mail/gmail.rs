use anyhow::{Context, Result};
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::auth::oauth::AuthContext;
use crate::domain::email::EmailId;
use crate::mail::source::{FetchedMessage, MessageSource};
use crate::mime::MessagePart;

pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";
const UNREAD_QUERY: &str = "is:unread";

// Wire model of users.messages.list / users.messages.get (format=full)

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMessagesResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GmailMessage {
    id: String,
    #[serde(default)]
    payload: Option<GmailPart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GmailPart {
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    body: Option<GmailBody>,
    #[serde(default)]
    parts: Vec<GmailPart>,
}

#[derive(Debug, Default, Deserialize)]
struct GmailBody {
    #[serde(default)]
    data: Option<String>,
}

impl From<GmailPart> for MessagePart {
    fn from(p: GmailPart) -> Self {
        MessagePart {
            media_type: p.mime_type,
            body: p.body.and_then(|b| b.data),
            children: p.parts.into_iter().map(MessagePart::from).collect(),
        }
    }
}

impl From<GmailMessage> for FetchedMessage {
    fn from(m: GmailMessage) -> Self {
        FetchedMessage {
            id: m.id,
            payload: m.payload.map(MessagePart::from).unwrap_or_default(),
        }
    }
}

/// Gmail REST client. Holds no credentials; see [`GmailClient::session`].
pub struct GmailClient {
    http: Client,
    base_url: String,
    user_id: String,
}

impl GmailClient {
    pub fn new(user_id: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("rs_gmail_reader/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: GMAIL_API_BASE.to_string(),
            user_id: user_id.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Bind the client to the current authorization for one listing pass.
    pub fn session(&self, auth: &mut AuthContext) -> Result<GmailSession<'_>> {
        Ok(GmailSession {
            client: self,
            access_token: auth.access_token()?,
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/users/{}/messages", self.base_url, self.user_id)
    }
}

pub struct GmailSession<'a> {
    client: &'a GmailClient,
    access_token: String,
}

impl GmailSession<'_> {
    fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        debug!("GET {url}");
        let resp = self
            .client
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()?;
        Ok(resp.json::<T>()?)
    }
}

impl MessageSource for GmailSession<'_> {
    fn list_unread(&self, max_results: u32) -> Result<Vec<EmailId>> {
        let list: ListMessagesResponse = self.get_json(
            &self.client.messages_url(),
            &[
                ("q", UNREAD_QUERY.to_string()),
                ("maxResults", max_results.to_string()),
            ],
        )?;
        Ok(list.messages.into_iter().map(|m| m.id).collect())
    }

    fn fetch(&self, id: &str) -> Result<FetchedMessage> {
        let url = format!("{}/{}", self.client.messages_url(), id);
        let msg: GmailMessage = self.get_json(&url, &[("format", "full".to_string())])?;
        Ok(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mime::select_text;

    #[test]
    fn list_response_without_messages_is_empty() {
        let list: ListMessagesResponse = serde_json::from_str(r#"{"resultSizeEstimate": 0}"#).unwrap();
        assert!(list.messages.is_empty());
    }

    #[test]
    fn list_response_ids_keep_order() {
        let list: ListMessagesResponse = serde_json::from_str(
            r#"{"messages":[{"id":"b2","threadId":"t"},{"id":"a1","threadId":"t"}]}"#,
        )
        .unwrap();
        let ids: Vec<_> = list.messages.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["b2", "a1"]);
    }

    #[test]
    fn multipart_payload_converts_to_tree() {
        let msg: GmailMessage = serde_json::from_str(
            r#"{
              "id": "18c0",
              "snippet": "ignored",
              "payload": {
                "mimeType": "multipart/alternative",
                "body": {"size": 0},
                "parts": [
                  {"partId": "0", "mimeType": "text/plain", "body": {"size": 2, "data": "aGk="}},
                  {"partId": "1", "mimeType": "text/html", "body": {"size": 9, "data": "PHA-aGk8L3A-"}}
                ]
              }
            }"#,
        )
        .unwrap();

        let fetched = FetchedMessage::from(msg);
        assert_eq!(fetched.id, "18c0");
        assert_eq!(fetched.payload.media_type, "multipart/alternative");
        assert_eq!(fetched.payload.body, None);
        assert_eq!(fetched.payload.children.len(), 2);
        assert_eq!(fetched.payload.children[0].body.as_deref(), Some("aGk="));
        assert_eq!(select_text(&fetched.payload).unwrap(), "hi");
    }

    #[test]
    fn missing_payload_renders_empty() {
        let msg: GmailMessage = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        let fetched = FetchedMessage::from(msg);
        assert_eq!(select_text(&fetched.payload).unwrap(), "");
    }

    #[test]
    fn messages_url_uses_user_and_base() {
        let client = GmailClient::new("me")
            .unwrap()
            .with_base_url("http://127.0.0.1:9/gmail/v1/");
        assert_eq!(client.messages_url(), "http://127.0.0.1:9/gmail/v1/users/me/messages");
    }
}
