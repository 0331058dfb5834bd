//! Text extraction from provider-delivered MIME trees.

pub mod decoder;
pub mod html;
pub mod part;
pub mod render;

pub use decoder::decode;
pub use html::html_to_text;
pub use part::MessagePart;
pub use render::select_text;
