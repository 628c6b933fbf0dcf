//! Common network-related structs.

mod asn;
mod prefix;

pub use asn::*;
pub use prefix::*;
