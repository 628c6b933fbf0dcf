#[cfg(test)]
mod tests {
    use bgpkit_codec::models::*;
    use bgpkit_codec::{parse_bgp_message, BgpMessage};
    use bytes::Bytes;
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    const MARKER: &str = "ffffffffffffffffffffffffffffffff";

    fn fixture(hex_str: &str) -> Vec<u8> {
        hex::decode(format!("{}{}", MARKER, hex_str)).unwrap()
    }

    fn announcement(path: &[u32]) -> BgpUpdateMessage {
        BgpUpdateMessage {
            attributes: vec![
                AttributeValue::Origin(Origin::IGP),
                AttributeValue::AsPath(AsPath::from_sequence(path)),
                AttributeValue::NextHop(Ipv4Addr::new(192, 0, 2, 1)),
            ]
            .into_iter()
            .collect(),
            announced_prefixes: vec![NetworkPrefix::from_str("198.51.100.0/24").unwrap()],
            ..Default::default()
        }
    }

    #[test]
    fn test_update_fixture() {
        let data = fixture(concat!(
            "002f02",             // length 47, UPDATE
            "0000",               // no withdrawn routes
            "0014",               // 20 bytes of attributes
            "40010100",           // ORIGIN IGP
            "4002060202fde9fdea", // AS_PATH 65001 65002
            "400304c0000201",     // NEXT_HOP 192.0.2.1
            "18c63364",           // 198.51.100.0/24
        ));
        let ctx = BgpContext::default();
        let msg = BgpMessage::from_bytes(&data, &ctx).unwrap();
        let update = match &msg {
            BgpMessage::Update(update) => update,
            m => panic!("unexpected message {:?}", m),
        };
        assert_eq!(update.attributes.origin(), Some(Origin::IGP));
        assert_eq!(
            update.attributes.as_path().unwrap().to_u32_vec(),
            Some(vec![65001, 65002])
        );
        assert_eq!(
            update.attributes.next_hop(),
            Some(Ipv4Addr::new(192, 0, 2, 1))
        );
        assert_eq!(
            update.announced_prefixes,
            vec![NetworkPrefix::from_str("198.51.100.0/24").unwrap()]
        );

        assert_eq!(msg, BgpMessage::Update(announcement(&[65001, 65002])));
        assert_eq!(msg.encode(&ctx).unwrap().as_ref(), data.as_slice());
    }

    #[test]
    fn test_as_path_round_trip() {
        for ctx in [BgpContext::default(), BgpContext::four_octet_as()] {
            let msg = BgpMessage::Update(announcement(&[65001, 65002]));
            let bytes = msg.encode(&ctx).unwrap();
            let decoded = BgpMessage::from_bytes(&bytes, &ctx).unwrap();
            let path = match &decoded {
                BgpMessage::Update(update) => update.attributes.as_path().unwrap().clone(),
                m => panic!("unexpected message {:?}", m),
            };
            assert_eq!(path.segments.len(), 1);
            match &path.segments[0] {
                AsPathSegment::AsSequence(asns) => {
                    assert_eq!(asns, &vec![Asn::from(65001u32), Asn::from(65002u32)]);
                }
                s => panic!("unexpected segment {:?}", s),
            }
            assert_eq!(decoded, msg);
        }
    }

    #[test]
    fn test_round_trip_all_message_types() {
        let mut open = BgpOpenMessage::new(
            Asn::new_16bit(65001),
            180,
            Ipv4Addr::new(192, 0, 2, 1),
        );
        open.opt_params.push(
            OptParam::from_capabilities(&[
                Capability::four_octet_as(Asn::new_32bit(65001)),
                Capability::new(BgpCapabilityType::ROUTE_REFRESH_CAPABILITY_FOR_BGP_4, vec![]),
            ])
            .unwrap(),
        );

        let mut full_update = announcement(&[65001, 65002]);
        full_update.withdrawn_prefixes = vec![
            NetworkPrefix::from_str("10.0.0.0/8").unwrap(),
            NetworkPrefix::from_str("192.0.2.128/25").unwrap(),
        ];
        full_update.attributes.push(Attribute::new(
            AttributeValue::MultiExitDiscriminator(100),
        ));
        full_update
            .attributes
            .push(Attribute::new(AttributeValue::LocalPreference(200)));
        full_update
            .attributes
            .push(Attribute::new(AttributeValue::AtomicAggregate));
        full_update.attributes.push(Attribute::new(AttributeValue::Aggregator {
            asn: Asn::new_16bit(65001),
            id: Ipv4Addr::new(192, 0, 2, 1),
        }));
        full_update
            .attributes
            .push(Attribute::new(AttributeValue::Communities(vec![
                Community::NoExport,
                Community::Custom(Asn::new_16bit(65001), 100),
            ])));

        let messages = vec![
            BgpMessage::Open(open),
            BgpMessage::Update(BgpUpdateMessage::default()),
            BgpMessage::Update(full_update),
            BgpMessage::Notification(BgpNotificationMessage::new(
                BgpError::UpdateError(UpdateError::MALFORMED_AS_PATH),
                vec![],
            )),
            BgpMessage::Notification(BgpNotificationMessage::cease(
                CeaseSubcode::ADMINISTRATIVE_RESET,
            )),
            BgpMessage::KeepAlive(BgpKeepAliveMessage {}),
        ];

        for ctx in [BgpContext::default(), BgpContext::four_octet_as()] {
            for msg in &messages {
                let bytes = msg.encode(&ctx).unwrap();
                assert_eq!(
                    u16::from_be_bytes([bytes[16], bytes[17]]) as usize,
                    bytes.len()
                );
                assert_eq!(bytes[18], u8::from(msg.msg_type()));
                assert_eq!(&BgpMessage::from_bytes(&bytes, &ctx).unwrap(), msg);
            }
        }
    }

    #[test]
    fn test_long_as_path_round_trip() {
        // 200 two-octet ASNs need more than 255 octets of attribute value
        let path: Vec<u32> = (1..=200).collect();
        let msg = BgpMessage::Update(announcement(&path));
        let ctx = BgpContext::default();
        let bytes = msg.encode(&ctx).unwrap();
        let decoded = BgpMessage::from_bytes(&bytes, &ctx).unwrap();

        let as_path = match &decoded {
            BgpMessage::Update(update) => update.attributes.get(AttrType::AS_PATH).unwrap(),
            m => panic!("unexpected message {:?}", m),
        };
        assert!(as_path.is_extended());
        assert!(as_path.is_transitive());
        assert_eq!(decoded, msg);
        assert_eq!(decoded.encode(&ctx).unwrap(), bytes);
    }

    #[test]
    fn test_four_octet_as_open() {
        let mut open = BgpOpenMessage::new(
            Asn::new_32bit(4200000001),
            90,
            Ipv4Addr::new(198, 51, 100, 7),
        );
        open.opt_params.push(
            OptParam::from_capabilities(&[Capability::four_octet_as(open.asn)]).unwrap(),
        );

        let ctx = BgpContext::four_octet_as();
        let bytes = BgpMessage::Open(open).encode(&ctx).unwrap();
        let decoded = match BgpMessage::from_bytes(&bytes, &ctx).unwrap() {
            BgpMessage::Open(open) => open,
            m => panic!("unexpected message {:?}", m),
        };
        assert_eq!(decoded.asn, Asn::from(AS_TRANS));
        assert_eq!(decoded.four_octet_asn(), Some(Asn::new_32bit(4200000001)));
        assert!(decoded.validate_optional_parameters().is_ok());
    }

    #[test]
    fn test_open_fixture() {
        let data = fixture("001d0104fde900b4c000020100");
        let msg = BgpMessage::from_bytes(&data, &BgpContext::default()).unwrap();
        assert_eq!(
            msg,
            BgpMessage::Open(BgpOpenMessage::new(
                Asn::new_16bit(65001),
                180,
                Ipv4Addr::new(192, 0, 2, 1)
            ))
        );
    }

    #[test]
    fn test_stream_of_messages() {
        let ctx = BgpContext::default();
        let messages = vec![
            BgpMessage::KeepAlive(BgpKeepAliveMessage {}),
            BgpMessage::Update(announcement(&[65001])),
            BgpMessage::KeepAlive(BgpKeepAliveMessage {}),
        ];
        let mut stream = vec![];
        for msg in &messages {
            stream.extend_from_slice(&msg.encode(&ctx).unwrap());
        }

        let mut data = Bytes::from(stream);
        let mut decoded = vec![];
        while !data.is_empty() {
            decoded.push(parse_bgp_message(&mut data, &ctx).unwrap());
        }
        assert_eq!(decoded, messages);
    }

    #[test]
    fn test_unknown_optional_transitive_round_trip() {
        let data = fixture(concat!(
            "003802",             // length 56, UPDATE
            "0000",               // no withdrawn routes
            "001d",               // 29 bytes of attributes
            "40010100",           // ORIGIN IGP
            "4002060202fde9fdea", // AS_PATH 65001 65002
            "400304c0000201",     // NEXT_HOP 192.0.2.1
            "c0630600010203fe05", // optional transitive type 99
            "18c63364",           // 198.51.100.0/24
        ));
        let ctx = BgpContext::default();
        let msg = BgpMessage::from_bytes(&data, &ctx).unwrap();
        let update = match &msg {
            BgpMessage::Update(update) => update,
            m => panic!("unexpected message {:?}", m),
        };
        let unknown = update.attributes.get(AttrType::Unknown(99)).unwrap();
        assert_eq!(
            unknown.value,
            AttributeValue::Unknown(AttrRaw {
                attr_type: 99,
                bytes: vec![0, 1, 2, 3, 0xfe, 5],
            })
        );
        assert_eq!(msg.encode(&ctx).unwrap().as_ref(), data.as_slice());

        let readvertised = update.attributes.to_readvertise();
        assert!(readvertised.get(AttrType::Unknown(99)).unwrap().is_partial());
    }
}
