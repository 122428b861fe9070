//! Content classification helpers.

pub mod text_type;

pub use text_type::TextType;
