//! Decode loosely typed key-value data into typed Rust records, and back.
//!
//! Data that arrives from JSON documents, configuration files or query strings is usually only
//! _loosely_ typed: a tree of maps, sequences and primitives. `restruct` reads such a tree, a
//! [`Value`], into a typed destination, collecting every field error along the way and reporting
//! each with the path at which it happened.
//!
//! # Overview
//! - [`Value`] is the dynamic source data model.
//! - Destinations implement [`Reflect`](reflect::Reflect). Primitives, strings, collections,
//!   `Option` and `Box` come implemented; records use the [`record!`] macro.
//! - [`decode`] and friends are one-shot conversions; a [`Decoder`] built from a
//!   [`DecoderConfig`] exposes every option: [hooks](hook), weak typing, squashing of embedded
//!   records, unused/unset key checks and [`Metadata`] collection.
//! - [`ToValue`] goes the other way, turning typed values back into [`Value`]s.
//! - With the _encode_ feature (on by default) any `serde` type can be encoded into a `Value`,
//!   and `Value` deserializes from any self-describing format. See the [`encode`] module.
//!
//! # Example
//! ```rust
//! use restruct::*;
//!
//! #[derive(Clone, Default, Debug, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: u8,
//!     emails: Vec<String>,
//! }
//!
//! record!(Person { name, age, emails });
//!
//! let input = Value::new_map(vec![
//!     ("name", Value::from("Mitchell")),
//!     ("age", Value::from("91")),
//!     ("emails", Value::from("one@example.com")),
//! ]);
//!
//! // strictly, a string is not a number
//! let err = input.decode::<Person>().unwrap_err();
//! assert_eq!(err.decode_errors().map(|e| e.len()), Some(2));
//!
//! // weak typing parses the age and lifts the single email into a sequence
//! let mut person = Person::default();
//! decode_weak(&input, &mut person).unwrap();
//! assert_eq!(person.age, 91);
//! assert_eq!(person.emails, vec!["one@example.com"]);
//! ```
//!
//! # Logging
//! Decoding emits [`tracing`](https://docs.rs/tracing) events: a `trace` event per decoded node
//! and a `debug` event when a pass fails. No subscriber is installed by the library.
mod ds;
mod error;
mod ns;
mod shape;
mod to_value;

pub mod decode;
#[cfg(feature = "encode")]
pub mod encode;
pub mod hook;
pub mod reflect;

pub use self::decode::{
    decode, decode_metadata, decode_weak, decode_weak_metadata, Decoder, DecoderConfig,
    MatchName, Metadata, DEFAULT_TAG_NAME,
};
pub use self::ds::*;
pub use self::error::{
    BoxError, ConfigError, DecodeError, DecodeErrors, Error, ErrorKind, ParseError, ParseReason,
};
pub use self::hook::DecodeHook;
pub use self::ns::{Namespace, Segment};
pub use self::reflect::Opaque;
pub use self::shape::{short_type_name, Kind, Shape};
pub use self::to_value::ToValue;
