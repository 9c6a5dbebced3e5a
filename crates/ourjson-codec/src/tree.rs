//! Recursive key transform over a JSON tree.
//!
//! Objects get every key rewritten; arrays keep their length and element
//! order; scalars (including `null`) are copied through untouched.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::key::{escape_key, unescape_key};

/// Return a copy of `value` with every object key made store-safe.
pub fn escape(value: &Value) -> Value {
    rewrite_keys(value, &escape_key)
}

/// Return a copy of `value` with every object key restored.
pub fn unescape(value: &Value) -> Value {
    rewrite_keys(value, &unescape_key)
}

fn rewrite_keys(value: &Value, key_fn: &dyn Fn(&str) -> Cow<'_, str>) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(key_fn(k).into_owned(), rewrite_keys(v, key_fn));
            }
            Value::Object(out)
        }
        Value::Array(items) => {
            Value::Array(items.iter().map(|v| rewrite_keys(v, key_fn)).collect())
        }
        scalar => scalar.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::is_store_safe;
    use proptest::prelude::*;
    use serde_json::json;

    fn all_keys_safe(value: &Value) -> bool {
        match value {
            Value::Object(map) => map.iter().all(|(k, v)| is_store_safe(k) && all_keys_safe(v)),
            Value::Array(items) => items.iter().all(all_keys_safe),
            _ => true,
        }
    }

    #[test]
    fn nested_objects_are_escaped() {
        let doc = json!({"$where": {"a.b": 1, "ok": [{"$in": [1, 2]}]}});
        let escaped = escape(&doc);
        assert_eq!(
            escaped,
            json!({"\\u0024where": {"a\\u002eb": 1, "ok": [{"\\u0024in": [1, 2]}]}})
        );
        assert_eq!(unescape(&escaped), doc);
    }

    #[test]
    fn scalar_arrays_are_untouched() {
        let doc = json!([1, "a.b", null, true, 2.5]);
        assert_eq!(escape(&doc), doc);
        assert_eq!(unescape(&doc), doc);
    }

    #[test]
    fn array_order_and_length_preserved() {
        let doc = json!([{"x.y": 1}, null, [{"$z": 2}], "s"]);
        let escaped = escape(&doc);
        let items = escaped.as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[1], Value::Null);
        assert_eq!(items[3], json!("s"));
        assert_eq!(items[0], json!({"x\\u002ey": 1}));
    }

    #[test]
    fn scalars_pass_through() {
        for v in [json!(null), json!(1), json!("$x.y"), json!(false)] {
            assert_eq!(escape(&v), v);
            assert_eq!(unescape(&v), v);
        }
    }

    #[test]
    fn string_values_are_not_rewritten() {
        let doc = json!({"k": "$a.b"});
        assert_eq!(escape(&doc), doc);
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let key = "[a-z$.\\\\u0-9]{0,8}";
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-z$.]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, move |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                prop::collection::btree_map(key, inner, 0..8)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn escape_then_unescape_is_identity(doc in arb_json()) {
            prop_assert_eq!(unescape(&escape(&doc)), doc);
        }

        #[test]
        fn escaped_trees_are_store_safe(doc in arb_json()) {
            prop_assert!(all_keys_safe(&escape(&doc)));
        }
    }
}
