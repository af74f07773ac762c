//! XML helpers shared by every part writer.

mod escape;

pub use escape::{escape_xml, unescape_xml};
