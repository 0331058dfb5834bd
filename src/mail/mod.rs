pub mod gmail;
pub mod inbox;
pub mod source;
