//! Error types for the text extraction pipeline.

/// The transfer-encoded payload of a body part was not valid URL-safe base64.
#[derive(Debug, thiserror::Error)]
#[error("invalid base64url payload: {0}")]
pub struct DecodeError(#[from] pub base64::DecodeError);

/// Failure while extracting the text of the selected part.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("could not decode message part: {0}")]
    Decode(#[from] DecodeError),
}
