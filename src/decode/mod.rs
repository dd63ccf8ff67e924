//! Decode loosely-typed [`Value`]s into typed destinations.
//!
//! The quickest way in is one of the free functions ([`decode`], [`decode_weak`],
//! [`decode_metadata`], [`decode_weak_metadata`]) or [`Value::decode`]. For anything more
//! (hooks, unused key checks, zeroing, squashing, custom tag names) build a [`Decoder`] from a
//! [`DecoderConfig`].
//!
//! # Example
//! ```rust
//! use restruct::*;
//!
//! #[derive(Clone, Default, Debug, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: i64,
//!     emails: Vec<String>,
//! }
//!
//! record!(Person { name, age, emails });
//!
//! let input = Value::new_map(vec![
//!     ("name", Value::from("Mitchell")),
//!     ("age", Value::from(91)),
//!     ("emails", Value::new_seq(vec!["one", "two", "three"])),
//! ]);
//!
//! let mut person = Person::default();
//! decode(&input, &mut person).unwrap();
//!
//! assert_eq!(person.name, "Mitchell");
//! assert_eq!(person.age, 91);
//! assert_eq!(person.emails, vec!["one", "two", "three"]);
//! ```
use crate::ds::Value;
use crate::error::{ConfigError, DecodeErrors, Error};
use crate::hook::DecodeHook;
use crate::ns::Namespace;
use crate::reflect::Reflect;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

mod collection;
mod engine;
mod record;
mod scalar;
mod weak;

/// The tag key read from record fields when none is configured.
pub const DEFAULT_TAG_NAME: &str = "restruct";

/// Decides whether a source map key names a record field. Called as `(key, field_name)` after
/// the exact comparison failed.
pub type MatchName = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// Unicode case-insensitive comparison, the default [`MatchName`].
///
/// # Example
/// ```rust
/// # use restruct::decode::eq_fold;
/// assert!(eq_fold("Name", "nAME"));
/// assert!(eq_fold("STRASSE", "strasse"));
/// assert!(!eq_fold("name", "names"));
/// ```
pub fn eq_fold(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// What a decode pass touched, collected when a [`Metadata`] is configured.
///
/// Entries are namespaces rendered by source key ([`Namespace::key_path`]).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Every location that was decoded.
    pub keys: Vec<String>,
    /// Source keys no record field consumed.
    pub unused: Vec<String>,
    /// Record fields with no matching source key.
    pub unset: Vec<String>,
}

/// The configuration of a [`Decoder`].
///
/// Every option defaults to off; an empty `tag_name` means [`DEFAULT_TAG_NAME`] and a missing
/// `match_name` means [`eq_fold`].
#[derive(Default)]
pub struct DecoderConfig<'r> {
    /// Run on every source value before it is decoded. See [`hook`](crate::hook).
    pub hook: Option<DecodeHook>,
    /// Fail when source map keys match no record field.
    pub error_unused: bool,
    /// Fail when record fields have no matching source key.
    pub error_unset: bool,
    /// Zero destinations before decoding into them, instead of merging.
    pub zero_fields: bool,
    /// Enable the lenient conversions between booleans, numbers, strings and sequences.
    pub weakly_typed_input: bool,
    /// Under weak typing, wrap negative numbers into unsigned destinations instead of failing.
    pub wrap_negative_unsigned: bool,
    /// Squash every embedded record field, as if tagged `squash`.
    pub squash: bool,
    /// When a record is flattened into a map, leave out fields without a tag.
    pub ignore_untagged_fields: bool,
    /// Where to record what was decoded.
    pub metadata: Option<&'r mut Metadata>,
    /// The destination.
    pub result: Option<&'r mut dyn Reflect>,
    /// The tag key read from record fields.
    pub tag_name: String,
    /// Fallback comparison of source keys against field names.
    pub match_name: Option<MatchName>,
}

impl<'r> fmt::Debug for DecoderConfig<'r> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DecoderConfig")
            .field("hook", &self.hook)
            .field("error_unused", &self.error_unused)
            .field("error_unset", &self.error_unset)
            .field("zero_fields", &self.zero_fields)
            .field("weakly_typed_input", &self.weakly_typed_input)
            .field("wrap_negative_unsigned", &self.wrap_negative_unsigned)
            .field("squash", &self.squash)
            .field("ignore_untagged_fields", &self.ignore_untagged_fields)
            .field("metadata", &self.metadata)
            .field("result", &self.result.as_ref().map(|r| r.shape()))
            .field("tag_name", &self.tag_name)
            .field("match_name", &self.match_name.as_ref().map(|_| "fn"))
            .finish()
    }
}

/// The frozen options of a decoder.
pub(crate) struct Settings {
    hook: Option<DecodeHook>,
    error_unused: bool,
    error_unset: bool,
    zero_fields: bool,
    weak: bool,
    wrap_negative: bool,
    squash: bool,
    ignore_untagged: bool,
    tag_name: Cow<'static, str>,
    match_name: MatchName,
}

/// A configured decoder bound to its destination.
///
/// # Example
/// ```rust
/// use restruct::*;
///
/// let mut out: Vec<u8> = Vec::new();
/// let mut meta = Metadata::default();
///
/// let mut dec = Decoder::new(DecoderConfig {
///     weakly_typed_input: true,
///     metadata: Some(&mut meta),
///     result: Some(&mut out),
///     ..Default::default()
/// }).unwrap();
///
/// dec.decode(&Value::new_seq(vec!["1", "2"])).unwrap();
/// drop(dec);
///
/// assert_eq!(out, vec![1, 2]);
/// assert_eq!(meta.keys, vec!["[0]", "[1]"]);
/// ```
pub struct Decoder<'r> {
    settings: Settings,
    metadata: Option<&'r mut Metadata>,
    result: &'r mut dyn Reflect,
}

impl<'r> Decoder<'r> {
    /// Validate `config` and build a decoder.
    pub fn new(config: DecoderConfig<'r>) -> Result<Self, ConfigError> {
        let DecoderConfig {
            hook,
            error_unused,
            error_unset,
            zero_fields,
            weakly_typed_input,
            wrap_negative_unsigned,
            squash,
            ignore_untagged_fields,
            metadata,
            result,
            tag_name,
            match_name,
        } = config;

        let result = result.ok_or(ConfigError::MissingResult)?;
        if wrap_negative_unsigned && !weakly_typed_input {
            return Err(ConfigError::WrapRequiresWeak);
        }

        let tag_name = if tag_name.is_empty() {
            tracing::debug!(tag_name = DEFAULT_TAG_NAME, "using default tag name");
            Cow::Borrowed(DEFAULT_TAG_NAME)
        } else {
            Cow::Owned(tag_name)
        };

        let settings = Settings {
            hook,
            error_unused,
            error_unset,
            zero_fields,
            weak: weakly_typed_input,
            wrap_negative: wrap_negative_unsigned,
            squash,
            ignore_untagged: ignore_untagged_fields,
            tag_name,
            match_name: match_name.unwrap_or_else(|| Arc::new(eq_fold)),
        };

        Ok(Decoder {
            settings,
            metadata,
            result,
        })
    }

    /// Decode `input` into the configured destination.
    ///
    /// Decoding continues past field failures; the error lists every one of them. When it fails
    /// the destination may be partially written.
    pub fn decode(&mut self, input: &Value) -> Result<(), DecodeErrors> {
        let shape = self.result.shape();
        tracing::trace!(destination = %shape, "decoding");

        let mut walker = engine::Walker::new(&self.settings, self.metadata.as_deref_mut());
        let res = walker
            .decode(&Namespace::new(), input, &mut *self.result)
            .or_else(DecodeErrors::into_result);

        if let Err(errs) = &res {
            tracing::debug!(destination = %shape, errors = errs.len(), "decode failed");
        }
        res
    }
}

fn run(input: &Value, config: DecoderConfig<'_>) -> Result<(), Error> {
    Decoder::new(config)?.decode(input)?;
    Ok(())
}

/// Decode `input` into `output` with the default configuration.
pub fn decode<T: Reflect>(input: &Value, output: &mut T) -> Result<(), Error> {
    run(
        input,
        DecoderConfig {
            result: Some(output),
            ..Default::default()
        },
    )
}

/// Decode `input` into `output` with weak typing enabled.
///
/// # Example
/// ```rust
/// # use restruct::*;
/// let mut n = 0u32;
/// decode_weak(&Value::from("0x1F"), &mut n).unwrap();
/// assert_eq!(n, 31);
///
/// let mut b = true;
/// decode_weak(&Value::from("0"), &mut b).unwrap();
/// assert!(!b);
/// ```
pub fn decode_weak<T: Reflect>(input: &Value, output: &mut T) -> Result<(), Error> {
    run(
        input,
        DecoderConfig {
            weakly_typed_input: true,
            result: Some(output),
            ..Default::default()
        },
    )
}

/// Decode `input` into `output`, recording what was touched in `metadata`.
pub fn decode_metadata<T: Reflect>(
    input: &Value,
    output: &mut T,
    metadata: &mut Metadata,
) -> Result<(), Error> {
    run(
        input,
        DecoderConfig {
            metadata: Some(metadata),
            result: Some(output),
            ..Default::default()
        },
    )
}

/// [`decode_metadata`] with weak typing enabled.
pub fn decode_weak_metadata<T: Reflect>(
    input: &Value,
    output: &mut T,
    metadata: &mut Metadata,
) -> Result<(), Error> {
    run(
        input,
        DecoderConfig {
            weakly_typed_input: true,
            metadata: Some(metadata),
            result: Some(output),
            ..Default::default()
        },
    )
}

impl Value {
    /// Decode the value into a fresh `T`.
    ///
    /// # Example
    /// ```rust
    /// # use restruct::*;
    /// let nums: Vec<i16> = Value::new_seq(vec![1, -2, 3]).decode().unwrap();
    /// assert_eq!(nums, vec![1, -2, 3]);
    /// ```
    pub fn decode<T: Reflect + Default>(&self) -> Result<T, Error> {
        let mut out = T::default();
        decode(self, &mut out)?;
        Ok(out)
    }
}
