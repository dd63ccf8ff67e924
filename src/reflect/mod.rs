//! Typed access to decode destinations.
//!
//! Rust has no runtime reflection, so a destination describes itself through [`Reflect`]: it
//! reports its [`Shape`] and hands out a [`Place`], a mutable view matching its kind. The
//! decoder only ever talks to destinations through these views, which keeps it a single
//! non-generic walk over `&mut dyn Reflect`.
//!
//! Implementations are provided for the primitive numbers, `bool`, `String`, [`Value`],
//! `Vec<T>`, `[T; N]`, `HashMap<K, V>`, `BTreeMap<K, V>`, `Option<T>`, `Box<T>`, [`Opaque<T>`]
//! and `()` (which has no decode rule). Records implement it through the
//! [`record!`](crate::record) macro.
use crate::ds::{Field, Native, Value};
use crate::error::DecodeErrors;
use crate::shape::Shape;
use crate::to_value::ToValue;
use std::any::Any;

mod impls;
mod macros;
mod tag;

pub use impls::Opaque;
pub use tag::{Tag, TagFlags};

/// A decode destination.
///
/// Every `Reflect` type is also [`ToValue`], so the decoder can snapshot a destination into
/// errors or flatten it into a map.
pub trait Reflect: ToValue + Any {
    /// The shape of the destination. Fixed for a given type.
    fn shape(&self) -> Shape;

    /// A mutable view of the destination.
    fn place(&mut self) -> Place<'_>;

    /// Reset the destination to its zero value.
    fn zero(&mut self);

    /// Assign a native value of the same type. Returns `false`, leaving `self` untouched, if the
    /// types differ.
    fn assign(&mut self, native: &Native) -> bool;
}

/// A mutable view of a destination, one variant per decode rule family.
#[allow(missing_docs)]
pub enum Place<'a> {
    Bool(&'a mut bool),
    Int(&'a mut dyn IntPlace),
    Uint(&'a mut dyn UintPlace),
    Float(&'a mut dyn FloatPlace),
    Str(&'a mut String),
    /// Accepts any source value as is.
    Dynamic(&'a mut Value),
    Record(&'a mut dyn RecordPlace),
    Map(&'a mut dyn MapPlace),
    Seq(&'a mut dyn SeqPlace),
    Array(&'a mut dyn SeqPlace),
    Ptr(&'a mut dyn PtrPlace),
    /// Only assignable through [`Reflect::assign`].
    Opaque,
    /// No decode rule.
    Unit,
}

/// A signed integer slot of some bit width.
pub trait IntPlace {
    fn bits(&self) -> u32;
    /// Store `value`; `false` if it does not fit.
    fn set(&mut self, value: i128) -> bool;
}

/// An unsigned integer slot of some bit width.
pub trait UintPlace {
    fn bits(&self) -> u32;
    /// Store `value`; `false` if it does not fit.
    fn set(&mut self, value: u128) -> bool;
}

/// A floating point slot of some bit width.
pub trait FloatPlace {
    fn bits(&self) -> u32;
    fn set(&mut self, value: f64);
}

/// A record: a static list of fields and mutable access to each of them.
///
/// `fields_mut` returns the fields in the same order as `fields` describes them.
pub trait RecordPlace: ToValue {
    fn fields(&self) -> &'static [Field];
    fn fields_mut(&mut self) -> Vec<&mut dyn Reflect>;
}

/// A growable sequence or a fixed length array.
pub trait SeqPlace: ToValue {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The shape of the element type.
    fn elem_shape(&self) -> Shape;

    /// Remove every element of a sequence, zero every element of an array.
    fn clear(&mut self);

    /// Truncate or extend a sequence with zero values to `len`. Arrays keep their length.
    fn resize(&mut self, len: usize);

    fn elem_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;
}

/// The callback [`MapPlace::insert_with`] fills a fresh entry with.
pub type FillEntry<'f> =
    dyn FnMut(&mut dyn Reflect, &mut dyn Reflect) -> Result<(), DecodeErrors> + 'f;

/// A keyed collection.
pub trait MapPlace: ToValue {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    /// Build a zero key and value, let `fill` decode into them, and insert the pair if it
    /// succeeds. An existing entry under the same key is replaced.
    fn insert_with(&mut self, fill: &mut FillEntry<'_>) -> Result<(), DecodeErrors>;
}

/// The callback [`PtrPlace::fill`] decodes the pointee with.
pub type FillPointee<'f> = dyn FnMut(&mut dyn Reflect) -> Result<(), DecodeErrors> + 'f;

/// An indirection: `Option<T>` (nullable) or `Box<T>`.
pub trait PtrPlace: ToValue {
    /// Set to null, or to the zero value when the pointer is not nullable.
    fn set_null(&mut self);

    /// The pointee, if there is one.
    fn pointee_mut(&mut self) -> Option<&mut dyn Reflect>;

    /// Decode into the pointee. A fresh zero pointee is allocated when the pointer is null or
    /// `fresh` is set, and only stored once `fill` succeeds.
    fn fill(&mut self, fresh: bool, fill: &mut FillPointee<'_>) -> Result<(), DecodeErrors>;
}
