//! The value graph handed to the serializer.

use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use super::array::ArrayRef;
use super::object::ObjectRef;

/// Any datum the serializer accepts.
///
/// Primitives are held inline. Arrays and objects are shared handles, so a
/// `Value` is in general a graph rather than a tree and may contain cycles.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absence of a value. Omitted from objects, `null` inside arrays.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number; non-finite values serialize as `null`.
    Number(f64),
    /// String.
    String(String),
    /// Sequence.
    Array(ArrayRef),
    /// Keyed mapping.
    Object(ObjectRef),
    /// Host value with no structured-data representation, named by type.
    Opaque(String),
}

impl Value {
    /// Whether this value is an array or object.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }

    /// Identity of a composite value; `None` for primitives.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Self::Array(array) => Some(array.identity()),
            Self::Object(object) => Some(object.identity()),
            _ => None,
        }
    }

    /// Create an opaque value from a type name.
    pub fn opaque(type_name: impl Into<String>) -> Self {
        Self::Opaque(type_name.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Self::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, usize, isize);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<ArrayRef> for Value {
    fn from(array: ArrayRef) -> Self {
        Self::Array(array)
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Self::Object(object)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::Array(ArrayRef::from_values(values))
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::from(items),
            JsonValue::Object(map) => {
                let object = ObjectRef::new();
                for (key, value) in map {
                    object.set(key, value);
                }
                Self::Object(object)
            }
        }
    }
}

impl From<&JsonValue> for Value {
    fn from(json: &JsonValue) -> Self {
        Self::from(json.clone())
    }
}

/// Serializes the decycled form of the value.
///
/// This never fails on cycles or throwing accessors; an absent root
/// serializes as unit (`null` in JSON).
///
/// Floats are written in the target serializer's own notation, so
/// `serde_json` produces `1e20` where [`crate::stringify`] produces
/// `100000000000000000000`. Use `stringify` for output byte-identical to the
/// standard serializer.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match crate::decycle::decycle(self) {
            Some(tree) => tree.serialize(serializer),
            None => serializer.serialize_unit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_option() {
        assert!(matches!(Value::from(None::<i32>), Value::Null));
        assert!(matches!(Value::from(Some("x")), Value::String(s) if s == "x"));
    }

    #[test]
    fn test_identity_only_for_composites() {
        assert!(Value::from(1).identity().is_none());
        assert!(Value::from(vec![1, 2]).identity().is_some());
        assert!(Value::Object(ObjectRef::new()).is_composite());
    }

    #[test]
    fn test_from_json_keeps_order() {
        let value = Value::from(json!({"z": 1, "a": [true, null]}));
        match value {
            Value::Object(obj) => assert_eq!(obj.keys(), vec!["z", "a"]),
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn test_serialize_through_serde_json() {
        let obj = ObjectRef::new();
        obj.set("self", obj.clone());
        obj.set("n", 1);
        let text = serde_json::to_string(&Value::Object(obj)).unwrap();
        assert_eq!(text, r#"{"self":"[Circular]","n":1}"#);
    }

    #[test]
    fn test_serialize_uses_target_float_notation() {
        let value = Value::from(vec![1e20]);
        assert_eq!(serde_json::to_string(&value).unwrap(), "[1e20]");
        assert_eq!(crate::stringify(&value), "[100000000000000000000]");
    }

    #[test]
    fn test_serialize_undefined_root() {
        assert_eq!(serde_json::to_string(&Value::Undefined).unwrap(), "null");
    }
}
