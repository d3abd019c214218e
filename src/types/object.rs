//! Shared, identity-bearing mappings.
//!
//! ## Key Order
//!
//! Own keys enumerate the way the standard serializer's host enumerates them:
//!
//! 1. Array-index keys (`"0"`, `"1"`, ... below 2^32 - 1), ascending numerically
//! 2. All other keys, in insertion order
//!
//! Redefining an existing key keeps its original position.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::slot::{Property, Slot};
use super::thrown::Thrown;
use super::value::Value;

/// `toJSON`-style conversion hook. Receives the key under which the object is
/// being serialized (`""` at the root, the decimal index inside arrays).
pub type ToJsonHook = Arc<dyn Fn(&str) -> Result<Value, Thrown> + Send + Sync>;

#[derive(Default)]
struct ObjectData {
    properties: Vec<(String, Property)>,
    prototype: Option<ObjectRef>,
    to_json: Option<ToJsonHook>,
}

/// Handle to a mapping in the value graph.
///
/// Clones share the same underlying storage. A freshly created object has no
/// prototype and inherits nothing.
#[derive(Clone, Default)]
pub struct ObjectRef(Arc<RwLock<ObjectData>>);

impl ObjectRef {
    /// Create an empty object with no prototype.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty object that inherits from `prototype`.
    ///
    /// Inherited properties are never serialized; only an inherited `toJSON`
    /// hook is observed.
    pub fn with_prototype(prototype: &ObjectRef) -> Self {
        let data = ObjectData {
            prototype: Some(prototype.clone()),
            ..ObjectData::default()
        };
        Self(Arc::new(RwLock::new(data)))
    }

    /// Set an enumerable data property.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.define_property(key, Property::enumerable(Slot::Data(value.into())));
    }

    /// Define an enumerable accessor property.
    pub fn define_getter<F>(&self, key: impl Into<String>, getter: F)
    where
        F: Fn() -> Result<Value, Thrown> + Send + Sync + 'static,
    {
        self.define_property(key, Property::enumerable(Slot::accessor(getter)));
    }

    /// Define or replace an own property.
    pub fn define_property(&self, key: impl Into<String>, property: Property) {
        let key = key.into();
        let mut data = self.0.write();
        match data.properties.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = property,
            None => data.properties.push((key, property)),
        }
    }

    /// Remove an own property, returning whether it existed.
    pub fn remove(&self, key: &str) -> bool {
        let mut data = self.0.write();
        let before = data.properties.len();
        data.properties.retain(|(k, _)| k != key);
        data.properties.len() != before
    }

    /// Install a `toJSON` hook on this object.
    pub fn set_to_json<F>(&self, hook: F)
    where
        F: Fn(&str) -> Result<Value, Thrown> + Send + Sync + 'static,
    {
        self.0.write().to_json = Some(Arc::new(hook));
    }

    /// Find the `toJSON` hook, looking through the prototype chain.
    pub fn to_json_hook(&self) -> Option<ToJsonHook> {
        let mut current = self.clone();
        loop {
            let next = {
                let data = current.0.read();
                if let Some(hook) = &data.to_json {
                    return Some(Arc::clone(hook));
                }
                data.prototype.clone()?
            };
            current = next;
        }
    }

    /// Own enumerable keys in enumeration order.
    pub fn keys(&self) -> Vec<String> {
        self.entries().into_iter().map(|(k, _)| k).collect()
    }

    /// Own enumerable properties in enumeration order, copied under the lock.
    ///
    /// Callers read the copy so that no lock is held while accessors run.
    pub fn entries(&self) -> Vec<(String, Slot)> {
        let data = self.0.read();
        let enumerable = data.properties.iter().filter(|(_, p)| p.enumerable);

        let mut indexed: Vec<(u32, &String, &Property)> = Vec::new();
        let mut named: Vec<(&String, &Property)> = Vec::new();
        for (key, property) in enumerable {
            match array_index(key) {
                Some(index) => indexed.push((index, key, property)),
                None => named.push((key, property)),
            }
        }
        indexed.sort_by_key(|(index, _, _)| *index);

        indexed
            .into_iter()
            .map(|(_, k, p)| (k, p))
            .chain(named)
            .map(|(k, p)| (k.clone(), p.slot.clone()))
            .collect()
    }

    /// Read an own property (enumerable or not).
    ///
    /// Returns `None` when the key is not an own property.
    pub fn get(&self, key: &str) -> Option<Result<Value, Thrown>> {
        let slot = {
            let data = self.0.read();
            data.properties
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, p)| p.slot.clone())?
        };
        Some(slot.extract())
    }

    /// Number of own properties, enumerable or not.
    pub fn len(&self) -> usize {
        self.0.read().properties.len()
    }

    /// Whether the object has no own properties.
    pub fn is_empty(&self) -> bool {
        self.0.read().properties.is_empty()
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address used as this object's identity.
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values are not printed; they may reach back to this object.
        f.debug_struct("ObjectRef")
            .field("identity", &format_args!("{:#x}", self.identity()))
            .field("keys", &self.keys())
            .finish()
    }
}

/// Parse a canonical array-index key.
fn array_index(key: &str) -> Option<u32> {
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|&index| index != u32::MAX)
}
