use proptest::prelude::*;

use btc_script::chunk::{decode_push_data, encode_push_data};
use btc_script::opcodes::*;
use btc_script::{AppendItem, Script, ScriptBuilder};

/// Defined opcodes that may be appended directly.
fn plain_opcode() -> impl Strategy<Value = u8> {
    prop_oneof![
        Just(OP_0),
        Just(OP_1NEGATE),
        OP_1..=OP_16,
        OP_NOP..=OP_CHECKSIGADD,
    ]
}

fn append_item() -> impl Strategy<Value = AppendItem> {
    prop_oneof![
        plain_opcode().prop_map(|op| AppendItem::Opcode(op as i64)),
        prop::collection::vec(any::<u8>(), 0..600).prop_map(AppendItem::Data),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn built_script_payload_roundtrip(items in prop::collection::vec(append_item(), 0..16)) {
        let mut builder = ScriptBuilder::new();
        builder.append(items).unwrap();
        let script = builder.into_script();
        let payload = script.to_payload();
        prop_assert_eq!(payload.len(), script.size());
        let parsed = Script::parse_from_payload(&payload).unwrap();
        prop_assert_eq!(parsed, script);
    }

    #[test]
    fn built_script_text_roundtrip(items in prop::collection::vec(append_item(), 0..16)) {
        let mut builder = ScriptBuilder::new();
        builder.append(items).unwrap();
        let script = builder.into_script();
        let reparsed = Script::from_string(&script.to_string()).unwrap();
        prop_assert_eq!(reparsed, script);
    }

    #[test]
    fn push_header_tier(len in 1usize..70_000) {
        let data = vec![0xa5u8; len];
        let encoded = encode_push_data(&data).unwrap();
        let expected_op = if len < 0x4c {
            len as u8
        } else if len < 0xff {
            OP_PUSHDATA1
        } else if len <= 0xffff {
            OP_PUSHDATA2
        } else {
            OP_PUSHDATA4
        };
        prop_assert_eq!(encoded[0], expected_op);
        let (decoded, consumed) = decode_push_data(&encoded, 0).unwrap().unwrap();
        prop_assert_eq!(consumed, encoded.len());
        prop_assert_eq!(decoded, data);
    }

    #[test]
    fn arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..512)) {
        if let Ok(script) = Script::parse_from_payload(&data) {
            prop_assert_eq!(script.to_payload(), data);
        }
    }

    #[test]
    fn script_hex_roundtrip(data in prop::collection::vec(any::<u8>(), 0..256)) {
        if let Ok(script) = Script::parse_from_payload(&data) {
            let script2 = Script::from_hex(&script.to_hex()).unwrap();
            prop_assert_eq!(script, script2);
        }
    }
}
