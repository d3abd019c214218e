//! Cycle-safe conversion of a value graph into a JSON tree.
//!
//! The decycler walks the graph depth-first and builds a `serde_json::Value`
//! tree that mirrors it, with two substitutions:
//!
//! - A composite that is already open on the current root-to-node path is
//!   replaced by `"[Circular]"`.
//! - A property, element or `toJSON` read that fails is replaced by
//!   `"[Throws: <message>]"` (or `"[Throws]"` when there is no message).
//!
//! ## Ancestor Tracking
//!
//! Open composites are tracked by identity in a set owned by a single call.
//! Entering a composite returns a [`PathGuard`] that removes the entry again on
//! drop, so every push has exactly one pop whatever happens in the subtree.
//! Siblings therefore never see stale ancestors, and the same object reached
//! along two different paths is serialized twice rather than cut.

use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

use serde_json::{Map, Number, Value as JsonValue};

use crate::types::{ArrayRef, ObjectRef, Thrown, Value};

/// Replaces a reference back to an open ancestor.
pub const CIRCULAR_SENTINEL: &str = "[Circular]";

/// Replaces a failed read whose error has no message.
pub const THROWS_SENTINEL: &str = "[Throws]";

/// Largest integer a `Number` holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Sentinel text for a failed read.
pub fn throws_sentinel(thrown: &Thrown) -> String {
    match thrown.message() {
        Some(message) => format!("[Throws: {message}]"),
        None => THROWS_SENTINEL.to_string(),
    }
}

/// Sentinel text for a host value with no structured representation.
pub fn opaque_sentinel(type_name: &str) -> String {
    format!("[Unserializable: {type_name}]")
}

/// Counters collected during one decycle pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecycleStats {
    /// Back-references replaced by `"[Circular]"`.
    pub circular: usize,
    /// Failed reads replaced by a throws sentinel.
    pub throws: usize,
}

/// Convert a value graph into an acyclic JSON tree.
///
/// Returns `None` when the root is absent (`Value::Undefined`), which the
/// standard serializer renders as no output at all.
pub fn decycle(root: &Value) -> Option<JsonValue> {
    decycle_with_stats(root).0
}

/// Like [`decycle`], also returning what was substituted.
pub fn decycle_with_stats(root: &Value) -> (Option<JsonValue>, DecycleStats) {
    let mut decycler = Decycler::default();
    let tree = decycler.visit("", root, true);
    debug_assert!(decycler.ancestors.is_empty());

    tracing::trace!(
        circular = decycler.stats.circular,
        throws = decycler.stats.throws,
        "Decycled value graph"
    );

    (tree, decycler.stats)
}

/// Per-call traversal state.
#[derive(Default)]
struct Decycler {
    /// Identities of the composites open on the current path.
    ancestors: HashSet<usize>,
    stats: DecycleStats,
}

impl Decycler {
    /// Visit a value reached under `key`.
    ///
    /// `apply_hook` is false for the result of a `toJSON` hook, which is not
    /// converted a second time.
    fn visit(&mut self, key: &str, value: &Value, apply_hook: bool) -> Option<JsonValue> {
        let id = match value {
            Value::Undefined => return None,
            Value::Null => return Some(JsonValue::Null),
            Value::Bool(b) => return Some(JsonValue::Bool(*b)),
            Value::Number(n) => return Some(number_to_json(*n)),
            Value::String(s) => return Some(JsonValue::String(s.clone())),
            Value::Opaque(name) => return Some(JsonValue::String(opaque_sentinel(name))),
            Value::Array(array) => array.identity(),
            Value::Object(object) => object.identity(),
        };

        if self.ancestors.contains(&id) {
            self.stats.circular += 1;
            return Some(JsonValue::String(CIRCULAR_SENTINEL.to_string()));
        }

        let mut path = PathGuard::enter(self, id);
        match value {
            Value::Object(object) => path.visit_object(key, object, apply_hook),
            Value::Array(array) => Some(path.visit_array(array)),
            _ => unreachable!("primitives return before entering the path"),
        }
    }

    fn visit_object(&mut self, key: &str, object: &ObjectRef, apply_hook: bool) -> Option<JsonValue> {
        if apply_hook {
            if let Some(hook) = object.to_json_hook() {
                return match hook(key) {
                    Ok(converted) => self.visit(key, &converted, false),
                    Err(thrown) => Some(self.throws(&thrown)),
                };
            }
        }

        // Keys are fixed up front; each value is read when its turn comes, so
        // a getter that changes a later property is observed.
        let mut map = Map::new();
        for name in object.keys() {
            let sanitized = match object.get(&name) {
                Some(Ok(value)) => self.visit(&name, &value, true),
                Some(Err(thrown)) => Some(self.throws(&thrown)),
                None => None,
            };
            // Absent members are dropped, as the standard serializer does.
            if let Some(sanitized) = sanitized {
                map.insert(name, sanitized);
            }
        }
        Some(JsonValue::Object(map))
    }

    fn visit_array(&mut self, array: &ArrayRef) -> JsonValue {
        let len = array.len();
        let items = (0..len)
            .map(|index| match array.get(index) {
                Some(Ok(value)) => self
                    .visit(&index.to_string(), &value, true)
                    .unwrap_or(JsonValue::Null),
                Some(Err(thrown)) => self.throws(&thrown),
                None => JsonValue::Null,
            })
            .collect();
        JsonValue::Array(items)
    }

    fn throws(&mut self, thrown: &Thrown) -> JsonValue {
        self.stats.throws += 1;
        JsonValue::String(throws_sentinel(thrown))
    }
}

/// Scoped membership of one composite in the ancestor set.
///
/// The entry is removed when the guard drops, including during unwinding.
struct PathGuard<'a> {
    decycler: &'a mut Decycler,
    id: usize,
}

impl<'a> PathGuard<'a> {
    fn enter(decycler: &'a mut Decycler, id: usize) -> Self {
        decycler.ancestors.insert(id);
        Self { decycler, id }
    }
}

impl Deref for PathGuard<'_> {
    type Target = Decycler;

    fn deref(&self) -> &Decycler {
        self.decycler
    }
}

impl DerefMut for PathGuard<'_> {
    fn deref_mut(&mut self) -> &mut Decycler {
        self.decycler
    }
}

impl Drop for PathGuard<'_> {
    fn drop(&mut self) {
        self.decycler.ancestors.remove(&self.id);
    }
}

/// Integral numbers in the safe range become JSON integers, other finite
/// numbers JSON floats, and NaN or infinities `null`.
fn number_to_json(n: f64) -> JsonValue {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        JsonValue::from(n as i64)
    } else {
        Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
    }
}
