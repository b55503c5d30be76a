use formfield_core::codec::{self, TaggedCodec, ValueCodec, WireCodec};
use formfield_core::{FieldValue, ValueShape};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn any_value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        any::<String>().prop_map(FieldValue::Scalar),
        any::<bool>().prop_map(FieldValue::Flag),
        proptest::collection::vec(any::<String>(), 0..6).prop_map(FieldValue::List),
    ]
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn shaped_decode_inverts_encode(value in any_value()) {
        let codec = ValueCodec::default();
        let wire = codec.encode(&value);
        prop_assert_eq!(codec.decode_as(value.shape(), &wire), value);
    }

    #[test]
    fn tagged_decode_inverts_encode(value in any_value()) {
        let codec = TaggedCodec::default();
        let wire = codec.encode(&value);
        prop_assert_eq!(codec.decode(value.shape(), &wire), value);
    }

    #[test]
    fn heuristic_decode_recovers_lists(items in proptest::collection::vec(any::<String>(), 0..6)) {
        let value = FieldValue::List(items);
        prop_assert_eq!(codec::decode(&codec::encode(&value)), value);
    }

    #[test]
    fn heuristic_decode_keeps_plain_text(text in "[A-Za-z0-9 ,.:;'!?-]{0,40}") {
        let value = FieldValue::Scalar(text);
        prop_assert_eq!(codec::decode(&codec::encode(&value)), value);
    }

    #[test]
    fn list_decode_never_yields_another_shape(wire in any::<String>()) {
        let decoded = ValueCodec::default().decode_as(ValueShape::List, &wire);
        prop_assert_eq!(decoded.shape(), ValueShape::List);
    }
}
