/*!
Structs that represent BGP-4 messages and their components.

The types here are plain values: every decode call produces fresh owned copies and every encode
call borrows them. None of them keep references into the input buffer.
*/
pub mod bgp;
pub mod network;

pub use bgp::*;
pub use network::*;
