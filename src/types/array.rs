//! Shared, identity-bearing sequences.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::slot::Slot;
use super::thrown::Thrown;
use super::value::Value;

/// Handle to a sequence in the value graph.
///
/// Clones share the same underlying storage, so an array can contain itself
/// (directly or through nested composites). Identity is the address of the
/// shared storage.
#[derive(Clone, Default)]
pub struct ArrayRef(Arc<RwLock<Vec<Slot>>>);

impl ArrayRef {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an array holding the given values.
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let slots = values.into_iter().map(|v| Slot::Data(v.into())).collect();
        Self(Arc::new(RwLock::new(slots)))
    }

    /// Append a value.
    pub fn push(&self, value: impl Into<Value>) {
        self.0.write().push(Slot::Data(value.into()));
    }

    /// Append an accessor element.
    pub fn push_accessor<F>(&self, getter: F)
    where
        F: Fn() -> Result<Value, Thrown> + Send + Sync + 'static,
    {
        self.0.write().push(Slot::accessor(getter));
    }

    /// Replace the element at `index`, padding with `Undefined` holes if the
    /// array is shorter.
    ///
    /// Returns `false`, leaving the array untouched, for `usize::MAX`, the one
    /// index no array length can cover.
    pub fn set(&self, index: usize, slot: impl Into<Slot>) -> bool {
        let Some(min_len) = index.checked_add(1) else {
            return false;
        };
        let mut slots = self.0.write();
        if slots.len() < min_len {
            slots.resize(min_len, Slot::Data(Value::Undefined));
        }
        slots[index] = slot.into();
        true
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Read the element at `index`.
    ///
    /// Returns `None` past the end. The lock is released before an accessor
    /// runs, so the accessor may modify this array.
    pub fn get(&self, index: usize) -> Option<Result<Value, Thrown>> {
        let slot = self.0.read().get(index).cloned()?;
        Some(slot.extract())
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address used as this array's identity.
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Contents are not printed; they may contain the array itself.
        f.debug_struct("ArrayRef")
            .field("identity", &format_args!("{:#x}", self.identity()))
            .field("len", &self.len())
            .finish()
    }
}
