//! Property tests.
//!
//! - Acyclic input stringifies exactly like `serde_json`
//! - Output is stable when parsed and stringified again
//! - Arbitrary cyclic graphs always produce valid JSON

use proptest::prelude::*;
use safe_json_stringify::{stringify, stringify_with, Indent, ObjectRef, Replacer, Value};
use serde_json::Value as JsonValue;

/// Acyclic JSON with integer numbers and keys that are never array indices.
fn arb_json() -> impl Strategy<Value = JsonValue> {
    let leaf = prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::Bool),
        any::<i32>().prop_map(JsonValue::from),
        "[a-z \"\\\\\n\t]{0,8}".prop_map(JsonValue::String),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(JsonValue::Array),
            prop::collection::vec(("[a-z_]{1,4}", inner), 0..5).prop_map(|pairs| {
                JsonValue::Object(pairs.into_iter().collect())
            }),
        ]
    })
}

/// Edge lists for a small object graph: `edges[i]` are the targets of node `i`.
fn arb_edges() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..6).prop_flat_map(|nodes| {
        prop::collection::vec(prop::collection::vec(0..nodes, 0..3), nodes)
    })
}

fn build_graph(edges: &[Vec<usize>]) -> Value {
    let nodes: Vec<ObjectRef> = edges.iter().map(|_| ObjectRef::new()).collect();
    for (from, targets) in edges.iter().enumerate() {
        nodes[from].set("id", from);
        for (slot, to) in targets.iter().enumerate() {
            nodes[from].set(format!("e{slot}"), nodes[*to].clone());
        }
    }
    Value::Object(nodes[0].clone())
}

proptest! {
    #[test]
    fn prop_acyclic_matches_serde_json(json in arb_json()) {
        let value = Value::from(&json);
        prop_assert_eq!(stringify(&value), serde_json::to_string(&json).unwrap());
    }

    #[test]
    fn prop_acyclic_pretty_matches_serde_json(json in arb_json()) {
        let value = Value::from(&json);
        prop_assert_eq!(
            stringify_with(&value, &Replacer::None, &Indent::Spaces(2)),
            serde_json::to_string_pretty(&json).unwrap()
        );
    }

    #[test]
    fn prop_restringify_is_stable(json in arb_json()) {
        let first = stringify(&Value::from(&json));
        let parsed: JsonValue = serde_json::from_str(&first).unwrap();
        let second = stringify(&Value::from(parsed));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_cyclic_graphs_terminate(edges in arb_edges()) {
        let text = stringify(&build_graph(&edges));
        let parsed: Result<JsonValue, _> = serde_json::from_str(&text);
        prop_assert!(parsed.is_ok(), "output must be valid JSON: {}", text);
    }

    #[test]
    fn prop_self_loops_are_cut(edges in arb_edges()) {
        let text = stringify(&build_graph(&edges));
        let has_self_loop = edges[0].contains(&0);
        if has_self_loop {
            prop_assert!(text.contains("[Circular]"));
        }
    }
}
