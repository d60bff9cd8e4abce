//! Shared helpers and proptest strategies for unit tests.

use proptest::prelude::*;

use crate::value::{Params, Value};

/// Builds a [`Params`] map from literal entries.
pub(crate) fn params(entries: &[(&str, Value)]) -> Params {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Identifier-like keys that contain no rule syntax characters.
pub(crate) fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,10}").unwrap()
}

/// Scalar and shallow collection values as they arrive from requests.
pub(crate) fn arb_value() -> impl Strategy<Value = Value> {
    let scalar = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e9..1.0e9f64).prop_map(Value::Decimal),
        "[ -~]{0,20}".prop_map(Value::String),
        "-?[0-9]{1,6}(\\.[0-9]{1,3})?".prop_map(Value::String),
        Just(Value::from("[1,2,3]")),
        Just(Value::from(r#"{"a":1}"#)),
    ]
    .boxed();
    prop_oneof![
        4 => scalar.clone(),
        1 => prop::collection::vec(scalar, 0..3).prop_map(Value::Sequence),
    ]
}

/// Small parameter maps keyed from a fixed pool so rules hit existing keys.
pub(crate) fn arb_params() -> impl Strategy<Value = Params> {
    prop::collection::vec((prop_oneof![Just("a"), Just("b"), Just("c")], arb_value()), 0..4)
        .prop_map(|entries| {
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect()
        })
}

/// Rule strings over the same key pool as [`arb_params`].
pub(crate) fn arb_rule() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just(""), Just("s:"), Just("i:"), Just("d:"), Just("f:"), Just("a:")],
        prop_oneof![Just("a"), Just("b"), Just("c"), Just("")],
        prop_oneof![Just(""), Just(":0"), Just(":1"), Just(":2")],
        prop_oneof![Just(""), Just("#x"), Just("#y")],
        prop_oneof![Just(""), Just("@default:5"), Just("@default:[1]"), Just("@default:")],
    )
        .prop_map(|(prefix, key, mode, rename, default)| {
            format!("{}{}{}{}{}", prefix, key, mode, rename, default)
        })
}

/// Printable strings guaranteed to contain no markup characters.
pub(crate) fn arb_plain_text(max_len: usize) -> impl Strategy<Value = String> {
    prop::string::string_regex(&format!("[A-Za-z0-9 .,_-]{{1,{}}}", max_len)).unwrap()
}
