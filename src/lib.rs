//! # safe-json-stringify
//!
//! JSON stringification that always produces a string.
//!
//! The standard serializer gives up on two common real-world inputs:
//! object graphs that refer back to themselves, and accessors or `toJSON`
//! hooks that fail while being read. This crate serializes both, substituting
//! sentinel strings for the parts that cannot be written:
//!
//! | Condition | Output |
//! |-----------|--------|
//! | reference to an object still being serialized | `"[Circular]"` |
//! | failed accessor / element / `toJSON` read | `"[Throws: <message>]"` |
//! | failed read with no message | `"[Throws]"` |
//! | host value with no JSON form | `"[Unserializable: <type>]"` |
//!
//! For every other input the output is identical to the standard serializer's,
//! including replacer functions, key allow-lists and indentation.
//!
//! ## Architecture
//!
//! ```text
//! Value graph → Decycler (graph → tree, identity-tracked) → Formatter (tree → text)
//!                                                              ↓
//!                                               replacer, indent, serde_json
//! ```
//!
//! ## Example
//!
//! ```rust
//! use safe_json_stringify::{stringify, ObjectRef, Thrown, Value};
//!
//! let a = ObjectRef::new();
//! a.set("a", a.clone());
//! a.set("b", "c");
//! a.define_getter("broken", || Err(Thrown::new("Broken")));
//!
//! assert_eq!(
//!     stringify(&Value::Object(a)),
//!     r#"{"a":"[Circular]","b":"c","broken":"[Throws: Broken]"}"#
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod decycle;
pub mod format;

// Re-exports
pub use types::{ArrayRef, Getter, ObjectRef, Property, Slot, Thrown, ToJsonHook, Value};
pub use decycle::{
    decycle, decycle_with_stats, throws_sentinel, opaque_sentinel,
    DecycleStats, CIRCULAR_SENTINEL, THROWS_SENTINEL,
};
pub use format::{format, format_number, Indent, Replacer, ReplacerFn, StringifyOptions, MAX_INDENT};

/// Text produced when there is nothing to write (absent root, or a replacer
/// that dropped it). This is how `serde_json` writes absence.
pub const ABSENT_OUTPUT: &str = "null";

/// Stringify with no replacer and compact output.
pub fn stringify(value: &Value) -> String {
    stringify_opts(value, &StringifyOptions::default())
}

/// Stringify with an explicit replacer and indentation.
pub fn stringify_with(value: &Value, replacer: &Replacer, indent: &Indent) -> String {
    render(value, replacer, indent).unwrap_or_else(|| ABSENT_OUTPUT.to_string())
}

/// Stringify with a set of options.
pub fn stringify_opts(value: &Value, options: &StringifyOptions) -> String {
    stringify_with(value, &options.replacer, &options.indent)
}

/// Stringify, reporting "no output" as `None` the way the standard serializer
/// does for an absent root or a replacer that drops the root.
pub fn try_stringify(value: &Value, options: &StringifyOptions) -> Option<String> {
    render(value, &options.replacer, &options.indent)
}

#[tracing::instrument(level = "trace", skip_all)]
fn render(value: &Value, replacer: &Replacer, indent: &Indent) -> Option<String> {
    let tree = decycle(value);
    format(tree, replacer, indent)
}
