/*!
bgpkit-codec reads and writes BGP-4 messages as they appear on a BGP session.

The codec is stateless: every call takes an input buffer and the negotiated session parameters
([BgpContext]) and returns owned values or a [ParserError] classified into the BGP NOTIFICATION
taxonomy. Transport, timers and the finite state machine are left to the caller.

# Examples

## Decode a message

```
use bgpkit_codec::models::*;
use bgpkit_codec::BgpMessage;

let data = hex::decode("ffffffffffffffffffffffffffffffff001304").unwrap();
let msg = BgpMessage::from_bytes(&data, &BgpContext::default()).unwrap();
assert_eq!(msg.msg_type(), BgpMessageType::KEEPALIVE);
```

## Frame a byte stream

[bgp_message_length] tells how many bytes the next message needs, and [parse_bgp_message]
consumes it from the front of the buffer.

```
use bgpkit_codec::models::*;
use bgpkit_codec::{bgp_message_length, parse_bgp_message};
use bytes::Bytes;

let mut stream = Bytes::from(hex::decode(
    "ffffffffffffffffffffffffffffffff001304ffffffffffffffffffffffffffffffff0015030602",
).unwrap());
let ctx = BgpContext::default();
while let Ok(Some(length)) = bgp_message_length(&stream) {
    if stream.len() < length {
        break;
    }
    let msg = parse_bgp_message(&mut stream, &ctx).unwrap();
    println!("{:?}", msg);
}
```

## Turn an error into a NOTIFICATION

```
use bgpkit_codec::models::*;
use bgpkit_codec::BgpMessage;

// message type 7 does not exist
let data = hex::decode("ffffffffffffffffffffffffffffffff001307").unwrap();
let err = BgpMessage::from_bytes(&data, &BgpContext::default()).unwrap_err();
let notification = err.to_notification();
assert_eq!(notification.error_code(), 1);
assert_eq!(notification.error_subcode(), 3);
assert_eq!(notification.data, vec![7]);
```

## Encode an UPDATE

```
use bgpkit_codec::models::*;
use std::net::Ipv4Addr;
use std::str::FromStr;

let update = BgpUpdateMessage {
    attributes: vec![
        AttributeValue::Origin(Origin::IGP),
        AttributeValue::AsPath(AsPath::from_sequence([65001, 65002])),
        AttributeValue::NextHop(Ipv4Addr::new(192, 0, 2, 1)),
    ]
    .into_iter()
    .collect(),
    announced_prefixes: vec![NetworkPrefix::from_str("198.51.100.0/24").unwrap()],
    ..Default::default()
};
let bytes = BgpMessage::Update(update).encode(&BgpContext::default()).unwrap();
assert_eq!(bytes[18], 2);
```

# Supported RFCs

- [X] [RFC 1997](https://datatracker.ietf.org/doc/html/rfc1997): BGP Communities Attribute
- [X] [RFC 4271](https://datatracker.ietf.org/doc/html/rfc4271): A Border Gateway Protocol 4 (BGP-4)
- [X] [RFC 4724](https://datatracker.ietf.org/doc/html/rfc4724): Graceful Restart Mechanism for BGP (End-of-RIB marker)
- [X] [RFC 5492](https://datatracker.ietf.org/doc/html/rfc5492): Capabilities Advertisement with BGP-4
- [X] [RFC 6793](https://datatracker.ietf.org/doc/html/rfc6793): BGP Support for Four-Octet Autonomous System (AS) Number Space
- [X] [RFC 9072](https://datatracker.ietf.org/doc/html/rfc9072): Extended Optional Parameters Length for BGP OPEN Message
*/

pub mod error;
pub mod models;
pub mod parser;

pub use error::ParserError;
pub use models::{BgpContext, BgpMessage};
pub use parser::{bgp_message_length, parse_bgp_message};
