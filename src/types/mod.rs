//! Value graph types.

pub mod value;
pub mod array;
pub mod object;
pub mod slot;
pub mod thrown;

pub use value::Value;
pub use array::ArrayRef;
pub use object::{ObjectRef, ToJsonHook};
pub use slot::{Getter, Property, Slot};
pub use thrown::Thrown;
