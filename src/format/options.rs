//! Replacer and indentation parameters.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::number::format_number;

/// Widest indentation the standard serializer honours.
pub const MAX_INDENT: usize = 10;

/// Replacer function: `(key, value) -> replacement`, `None` meaning absent.
pub type ReplacerFn = Arc<dyn Fn(&str, &JsonValue) -> Option<JsonValue> + Send + Sync>;

/// Caller-supplied filter applied while producing the final text.
#[derive(Clone, Default)]
pub enum Replacer {
    /// No filtering.
    #[default]
    None,
    /// Called for the root (key `""`) and then for every member and element of
    /// whatever it returns, layer by layer.
    Function(ReplacerFn),
    /// Only these keys are emitted from every mapping, in this order.
    AllowList(Vec<String>),
}

impl Replacer {
    /// Create a function replacer.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&str, &JsonValue) -> Option<JsonValue> + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    /// Create an allow-list replacer. Duplicate keys keep their first position.
    pub fn allow_list<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into();
            if !list.contains(&key) {
                list.push(key);
            }
        }
        Self::AllowList(list)
    }

    /// Create an allow-list from JSON entries.
    ///
    /// Strings are taken as-is, numbers in number notation; other entries
    /// are ignored.
    pub fn allow_list_from_json(entries: &[JsonValue]) -> Self {
        Self::allow_list(entries.iter().filter_map(|entry| match entry {
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Number(n) => Some(match n.as_f64() {
                Some(f) if n.is_f64() => format_number(f),
                _ => n.to_string(),
            }),
            _ => None,
        }))
    }
}

impl fmt::Debug for Replacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Function(_) => f.write_str("Function(..)"),
            Self::AllowList(keys) => f.debug_tuple("AllowList").field(keys).finish(),
        }
    }
}

/// Indentation per nesting level.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Indent {
    /// Compact output.
    #[default]
    None,
    /// This many spaces, capped at [`MAX_INDENT`].
    Spaces(usize),
    /// This text verbatim, truncated to [`MAX_INDENT`] characters.
    Text(String),
}

impl Indent {
    /// Interpret a JSON indentation argument: numbers are a space count
    /// (fractions truncated, below one meaning none), strings are literal,
    /// anything else means none.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Number(n) => match n.as_f64() {
                Some(f) if f >= 1.0 => Self::Spaces(f.min(MAX_INDENT as f64) as usize),
                _ => Self::None,
            },
            JsonValue::String(s) => Self::Text(s.clone()),
            _ => Self::None,
        }
    }

    /// The text written once per nesting level. Empty means compact output.
    pub fn gap(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Spaces(n) => " ".repeat((*n).min(MAX_INDENT)),
            Self::Text(s) => s.chars().take(MAX_INDENT).collect(),
        }
    }
}

impl From<usize> for Indent {
    fn from(n: usize) -> Self {
        Self::Spaces(n)
    }
}

impl From<i32> for Indent {
    fn from(n: i32) -> Self {
        match usize::try_from(n) {
            Ok(n) if n > 0 => Self::Spaces(n),
            _ => Self::None,
        }
    }
}

impl From<&str> for Indent {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Indent {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Replacer and indentation for one stringify call.
#[derive(Debug, Clone, Default)]
pub struct StringifyOptions {
    /// Filter applied while producing the text.
    pub replacer: Replacer,
    /// Indentation per level.
    pub indent: Indent,
}

impl StringifyOptions {
    /// Options for compact, unfiltered output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the replacer.
    pub fn with_replacer(mut self, replacer: Replacer) -> Self {
        self.replacer = replacer;
        self
    }

    /// Set the indentation.
    pub fn with_indent(mut self, indent: impl Into<Indent>) -> Self {
        self.indent = indent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gap_capped() {
        assert_eq!(Indent::Spaces(3).gap(), "   ");
        assert_eq!(Indent::Spaces(25).gap(), " ".repeat(10));
        assert_eq!(Indent::Text("\t".into()).gap(), "\t");
        assert_eq!(Indent::from("abcdefghijklmnop").gap(), "abcdefghij");
        assert_eq!(Indent::None.gap(), "");
        assert_eq!(Indent::Spaces(0).gap(), "");
    }

    #[test]
    fn test_indent_from_json() {
        assert_eq!(Indent::from_json(&json!(4)), Indent::Spaces(4));
        assert_eq!(Indent::from_json(&json!(2.9)), Indent::Spaces(2));
        assert_eq!(Indent::from_json(&json!(100)), Indent::Spaces(10));
        assert_eq!(Indent::from_json(&json!(0.5)), Indent::None);
        assert_eq!(Indent::from_json(&json!(-3)), Indent::None);
        assert_eq!(Indent::from_json(&json!("--")), Indent::Text("--".into()));
        assert_eq!(Indent::from_json(&json!(true)), Indent::None);
    }

    #[test]
    fn test_indent_deserialize() {
        let spaces: Indent = serde_json::from_str("2").unwrap();
        let text: Indent = serde_json::from_str(r#""\t""#).unwrap();
        let none: Indent = serde_json::from_str("null").unwrap();
        assert_eq!(spaces, Indent::Spaces(2));
        assert_eq!(text, Indent::Text("\t".into()));
        assert_eq!(none, Indent::None);
    }

    #[test]
    fn test_allow_list_dedup() {
        match Replacer::allow_list(["a", "b", "a"]) {
            Replacer::AllowList(keys) => assert_eq!(keys, vec!["a", "b"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_allow_list_from_json() {
        let replacer = Replacer::allow_list_from_json(&[json!("a"), json!(1), json!(1.5), json!(null), json!({})]);
        match replacer {
            Replacer::AllowList(keys) => assert_eq!(keys, vec!["a", "1", "1.5"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_options_builder() {
        let options = StringifyOptions::new()
            .with_indent(2)
            .with_replacer(Replacer::allow_list(["x"]));
        assert_eq!(options.indent, Indent::Spaces(2));
        assert!(matches!(options.replacer, Replacer::AllowList(_)));
    }
}
