/// A node in a message's MIME tree.
///
/// Leaf parts carry a transfer-encoded `body`; container parts carry
/// `children`, in the order the provider delivered them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePart {
    pub media_type: String,
    pub body: Option<String>,
    pub children: Vec<MessagePart>,
}

impl MessagePart {
    pub fn leaf(media_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            body: Some(body.into()),
            children: Vec::new(),
        }
    }

    pub fn container(media_type: impl Into<String>, children: Vec<MessagePart>) -> Self {
        Self {
            media_type: media_type.into(),
            body: None,
            children,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.body.as_deref().is_none_or(str::is_empty) && self.children.is_empty()
    }
}
