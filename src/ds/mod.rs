//! The dynamic data model: source values and their building blocks.
use std::collections::BTreeMap;

mod native;
mod num;
mod record;
mod val;

pub use native::Native;
pub use num::{IntoIntError, Number};
pub use record::{Field, FieldValue, RecordValue};
pub use val::Value;

/// A keyed collection of values, ordered by key.
pub type Map = BTreeMap<Value, Value>;
