//! Conversion between `serde` data structures and [`Value`].
//!
//! Requires the _encode_ feature.
//!
//! Any type that implements [`Serialize`] can be _encoded_ into a `Value` through the [`Encoder`],
//! and `Value` itself implements [`Deserialize`], so any self-describing format (JSON through
//! `serde_json`, for instance) reads straight into a `Value` ready for decoding.
//!
//! # Examples
//! Encoding a tuple.
//!
//! ```rust
//! # use restruct::*;
//! let data = (100, "Hello, world!", 3.14);
//!
//! let expected = Value::new_seq(vec![
//!     Value::from(100),
//!     Value::from("Hello, world!"),
//!     Value::from(3.14),
//! ]);
//!
//! assert_eq!(Value::enc(&data), Ok(expected));
//! ```
//!
//! Encoding a `serde` structure and decoding it into a typed record.
//!
//! ```rust
//! # use restruct::*;
//! # use serde_derive::Serialize;
//! #[derive(Serialize)]
//! struct Wire {
//!     name: String,
//!     age: u32,
//! }
//!
//! #[derive(Clone, Default, Debug, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: u8,
//! }
//!
//! record!(Person { name, age });
//!
//! let value = Value::enc(&Wire { name: "Mitchell".into(), age: 91 }).unwrap();
//! let person: Person = value.decode().unwrap();
//! assert_eq!(person, Person { name: "Mitchell".into(), age: 91 });
//! ```
//!
//! [`Deserialize`]: crate::encode::Deserialize
//! [`Encoder`]: crate::encode::Encoder
//! [`Serialize`]: crate::encode::Serialize
//! [`Value`]: crate::Value
use crate::*;

mod de;
mod encoder;

pub use self::encoder::{EncodeError, Encoder};
pub use serde::{Deserialize, Serialize};

impl Value {
    /// Encode `T` into a `Value`.
    ///
    /// Requires the _encode_ feature.
    ///
    /// Convenience function for `data.serialize(Encoder)`.
    ///
    /// See [`Encoder`](encode::Encoder) for usage.
    pub fn enc<T: Serialize + ?Sized>(data: &T) -> Result<Self, EncodeError> {
        data.serialize(Encoder)
    }
}
