//! BGP message codecs.
pub mod attributes;
pub mod messages;

pub use attributes::{encode_attributes, parse_attributes};
pub use messages::*;
