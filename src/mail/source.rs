use anyhow::Result;

use crate::domain::email::EmailId;
use crate::mime::MessagePart;

/// A message as delivered by the provider, before text extraction.
#[derive(Debug, Clone)]
pub struct FetchedMessage {
    pub id: EmailId,
    pub payload: MessagePart,
}

/// Something that can list and fetch unread messages for an already
/// authorized account.
pub trait MessageSource {
    /// Ids of up to `max_results` unread messages, newest first.
    fn list_unread(&self, max_results: u32) -> Result<Vec<EmailId>>;

    fn fetch(&self, id: &str) -> Result<FetchedMessage>;
}
