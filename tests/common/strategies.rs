use proptest::prelude::*;
use serde_json::Value;

use orchestrator_client::ContentMap;

/// Strategy for scalar JSON values that survive a serde_json round trip exactly
pub fn json_scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        ".{0,24}".prop_map(Value::from),
    ]
}

/// Strategy for JSON values nested up to two levels deep
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    json_scalar_strategy().prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::hash_map("[a-zA-Z_][a-zA-Z0-9_]{0,8}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Strategy for queue item specific content
pub fn content_map_strategy() -> impl Strategy<Value = ContentMap> {
    prop::collection::hash_map("[a-zA-Z_][a-zA-Z0-9_]{0,16}", json_value_strategy(), 0..10)
}
