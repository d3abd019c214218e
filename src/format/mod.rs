//! Final text production.
//!
//! The formatter takes the decycled tree and hands it to `serde_json`, applying
//! the replacer and indentation the way the standard serializer does:
//!
//! ```text
//! tree → replacer (function or allow-list) → serde_json::Serializer → text
//!                                              ↑
//!                        HostNumberFormatter<CompactFormatter | PrettyFormatter>
//! ```
//!
//! The tree is acyclic by construction, so nothing here can recurse forever.

pub mod number;
pub mod options;

use serde::Serialize;
use serde_json::ser::{CompactFormatter, PrettyFormatter};
use serde_json::{Map, Serializer, Value as JsonValue};

pub use number::{format_number, HostNumberFormatter};
pub use options::{Indent, Replacer, ReplacerFn, StringifyOptions, MAX_INDENT};

/// Produce the final text for a decycled tree.
///
/// Returns `None` when there is nothing to write: the tree is absent, or a
/// replacer function dropped the root.
pub fn format(tree: Option<JsonValue>, replacer: &Replacer, indent: &Indent) -> Option<String> {
    let tree = match replacer {
        Replacer::None => tree?,
        Replacer::Function(f) => apply_function(f.as_ref(), "", tree?)?,
        Replacer::AllowList(keys) => apply_allow_list(keys, tree?),
    };
    Some(write_json(&tree, &indent.gap()))
}

/// Run the replacer on `value`, then on every member of its result.
fn apply_function(
    f: &(dyn Fn(&str, &JsonValue) -> Option<JsonValue> + Send + Sync),
    key: &str,
    value: JsonValue,
) -> Option<JsonValue> {
    let replaced = f(key, &value)?;
    Some(match replaced {
        JsonValue::Object(map) => JsonValue::Object(
            map.into_iter()
                .filter_map(|(name, member)| {
                    let member = apply_function(f, &name, member)?;
                    Some((name, member))
                })
                .collect(),
        ),
        JsonValue::Array(items) => JsonValue::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    apply_function(f, &index.to_string(), item).unwrap_or(JsonValue::Null)
                })
                .collect(),
        ),
        other => other,
    })
}

/// Keep only allowed keys, in allow-list order, in every mapping.
fn apply_allow_list(keys: &[String], value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(mut map) => {
            let mut filtered = Map::new();
            for key in keys {
                if let Some(member) = map.remove(key) {
                    filtered.insert(key.clone(), apply_allow_list(keys, member));
                }
            }
            JsonValue::Object(filtered)
        }
        JsonValue::Array(items) => JsonValue::Array(
            items
                .into_iter()
                .map(|item| apply_allow_list(keys, item))
                .collect(),
        ),
        other => other,
    }
}

fn write_json(tree: &JsonValue, gap: &str) -> String {
    let mut out = Vec::with_capacity(128);
    let result = if gap.is_empty() {
        let formatter = HostNumberFormatter::new(CompactFormatter);
        tree.serialize(&mut Serializer::with_formatter(&mut out, formatter))
    } else {
        let formatter = HostNumberFormatter::new(PrettyFormatter::with_indent(gap.as_bytes()));
        tree.serialize(&mut Serializer::with_formatter(&mut out, formatter))
    };

    match result {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(e) => {
            // Writing a JSON tree into memory has no failure path in practice.
            tracing::warn!(error = %e, "JSON writer failed; substituting sentinel");
            JsonValue::String(format!("[Throws: {e}]")).to_string()
        }
    }
}
