/*!
parser module contains the wire codecs: the primitive field readers in [utils], and the message
and path attribute codecs in [bgp].
*/
pub mod bgp;
pub mod utils;

pub use self::bgp::*;
pub use self::utils::*;
