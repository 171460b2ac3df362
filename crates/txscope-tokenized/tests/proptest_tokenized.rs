use proptest::prelude::*;

use txscope_tokenized::{DecodeContext, FieldValue, Schema, SchemaSet, TypeCode};

const ACTIONS_JSON: &str = r#"{
    "messages": [
        { "code": "T1", "name": "Transfer", "fields": [
            { "name": "Instruments", "type": "InstrumentTransfer[]" },
            { "name": "OfferExpiry", "type": "uint" },
            { "name": "ExchangeFee", "type": "uint" }
        ] }
    ],
    "fieldTypes": [
        { "name": "InstrumentTransfer", "fields": [
            { "name": "ContractIndex", "type": "uint" },
            { "name": "InstrumentCode", "type": "bin" },
            { "name": "Senders", "type": "uint[]" },
            { "name": "Nested", "type": "InstrumentTransfer" }
        ] }
    ]
}"#;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn arbitrary_payloads_never_panic(payload in prop::collection::vec(any::<u8>(), 0..256)) {
        let schemas = SchemaSet::new(Schema::from_json(ACTIONS_JSON).unwrap(), Schema::default(), Schema::default());
        let ctx = DecodeContext::new(&schemas);
        if let Ok(value) = ctx.decode_action("T1", &payload) {
            prop_assert_eq!(value.name(), Some("Transfer"));
        }
    }

    #[test]
    fn single_varint_field_decodes(fee in any::<u64>()) {
        let schemas = SchemaSet::new(Schema::from_json(ACTIONS_JSON).unwrap(), Schema::default(), Schema::default());
        let mut payload = Vec::new();
        prost::encoding::encode_key(3, prost::encoding::WireType::Varint, &mut payload);
        prost::encoding::encode_varint(fee, &mut payload);

        let value = DecodeContext::new(&schemas).decode_action("T1", &payload).unwrap();
        prop_assert_eq!(value.field("ExchangeFee"), Some(&FieldValue::UInt(fee)));
    }

    #[test]
    fn numeric_codes_match_with_leading_zeros(n in 0u64..100_000, zeros in 0usize..4) {
        let padded = format!("{}{}", "0".repeat(zeros), n);
        prop_assert!(TypeCode(n.to_string()).matches(&padded));
    }
}
