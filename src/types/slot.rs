//! Property and element slots.

use std::fmt;
use std::sync::Arc;

use super::thrown::Thrown;
use super::value::Value;

/// Closure backing an accessor slot.
pub type Getter = Arc<dyn Fn() -> Result<Value, Thrown> + Send + Sync>;

/// Storage for one array element or object property.
#[derive(Clone)]
pub enum Slot {
    /// Plain stored value.
    Data(Value),
    /// Computed value; reading it runs the getter, which may fail.
    Accessor(Getter),
}

impl Slot {
    /// Create an accessor slot from a closure.
    pub fn accessor<F>(getter: F) -> Self
    where
        F: Fn() -> Result<Value, Thrown> + Send + Sync + 'static,
    {
        Self::Accessor(Arc::new(getter))
    }

    /// Read the slot's value.
    ///
    /// Every read is independently fallible: a data slot always succeeds, an
    /// accessor slot returns whatever its getter returns.
    pub fn extract(&self) -> Result<Value, Thrown> {
        match self {
            Self::Data(value) => Ok(value.clone()),
            Self::Accessor(getter) => getter(),
        }
    }
}

impl From<Value> for Slot {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(value) => f.debug_tuple("Data").field(value).finish(),
            Self::Accessor(_) => f.write_str("Accessor(..)"),
        }
    }
}

/// An own property of an object.
#[derive(Debug, Clone)]
pub struct Property {
    /// Where the value comes from.
    pub slot: Slot,
    /// Whether key enumeration (and therefore serialization) sees it.
    pub enumerable: bool,
}

impl Property {
    /// Create an enumerable property.
    pub fn enumerable(slot: impl Into<Slot>) -> Self {
        Self { slot: slot.into(), enumerable: true }
    }

    /// Create a non-enumerable property.
    pub fn hidden(slot: impl Into<Slot>) -> Self {
        Self { slot: slot.into(), enumerable: false }
    }
}
