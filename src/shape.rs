//! Canonical classification of decode destinations and source values.
use crate::ds::Native;
use std::any::{type_name, Any, TypeId};
use std::fmt;

/// The decode rule family of a type.
///
/// Every destination type maps to exactly one `Kind`, fixed by its [`Reflect`] implementation.
/// Source [`Value`]s map to a kind through [`Value::kind`]. Sized variants of a family (`i8`
/// through `i128`, `f32` and `f64`, ...) share a kind and differ only in their bit width.
///
/// [`Reflect`]: crate::reflect::Reflect
/// [`Value`]: crate::Value
/// [`Value::kind`]: crate::Value::kind
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The absence of a value. Only a nil source has this kind.
    Invalid,
    /// Booleans.
    Bool,
    /// Signed integers.
    Int,
    /// Unsigned integers.
    Uint,
    /// Floating point numbers.
    Float,
    /// Text.
    String,
    /// Keyed collections.
    Map,
    /// Growable sequences (and source byte arrays).
    Seq,
    /// Fixed length sequences.
    Array,
    /// Named records with fields.
    Record,
    /// An optional or boxed indirection to another destination.
    Ptr,
    /// A slot that accepts any source value as is.
    Dynamic,
    /// A value only assignable from a native value of the exact same type.
    Opaque,
    /// A type with no decode rule.
    Unit,
}

impl Kind {
    /// The lowercase name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Invalid => "invalid",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Map => "map",
            Kind::Seq => "seq",
            Kind::Array => "array",
            Kind::Record => "record",
            Kind::Ptr => "ptr",
            Kind::Dynamic => "dynamic",
            Kind::Opaque => "opaque",
            Kind::Unit => "unit",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lightweight type descriptor: the [`Kind`] plus the type identity.
///
/// Shapes are what decode hooks receive to decide whether to act, and what error messages use to
/// name the expected and received types.
///
/// # Example
/// ```rust
/// # use restruct::*;
/// use restruct::reflect::Reflect;
///
/// let shape = Vec::<String>::new().shape();
/// assert_eq!(shape.kind(), Kind::Seq);
/// assert_eq!(shape.name(), "Vec<String>");
/// assert!(shape.is::<Vec<String>>());
///
/// assert_eq!(Value::from("hello").shape().name(), "string");
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Shape {
    kind: Kind,
    name: &'static str,
    id: Option<TypeId>,
}

impl Shape {
    /// The shape of the Rust type `T` with the given kind.
    pub fn of<T: ?Sized + Any>(kind: Kind) -> Self {
        Shape {
            kind,
            name: type_name::<T>(),
            id: Some(TypeId::of::<T>()),
        }
    }

    /// A shape without a Rust type behind it, such as the shape of a source value.
    pub const fn named(kind: Kind, name: &'static str) -> Self {
        Shape {
            kind,
            name,
            id: None,
        }
    }

    pub(crate) fn from_native(kind: Kind, native: &Native) -> Self {
        Shape {
            kind,
            name: native.type_name(),
            id: Some(native.id()),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The short type name, with module paths stripped (`Vec<String>`, not
    /// `alloc::vec::Vec<alloc::string::String>`).
    pub fn name(&self) -> String {
        short_type_name(self.name)
    }

    /// The full type name as reported by the compiler.
    pub fn full_name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> Option<TypeId> {
        self.id
    }

    /// The shape describes exactly the Rust type `T`.
    pub fn is<T: ?Sized + Any>(&self) -> bool {
        self.id == Some(TypeId::of::<T>())
    }
}

/// Shapes are equal if they describe the same Rust type, or, lacking type identity, have the same
/// kind and name.
impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.kind == other.kind && self.name == other.name,
            _ => false,
        }
    }
}

impl Eq for Shape {}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Strips module paths from a compiler type name.
///
/// # Example
/// ```rust
/// # use restruct::short_type_name;
/// assert_eq!(
///     short_type_name("std::collections::hash::map::HashMap<alloc::string::String, u8>"),
///     "HashMap<String, u8>"
/// );
/// assert_eq!(short_type_name("[my_crate::Point; 3]"), "[Point; 3]");
/// ```
pub fn short_type_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut segment = String::new();

    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            out.push_str(segment.rsplit("::").next().unwrap_or(""));
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(segment.rsplit("::").next().unwrap_or(""));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names() {
        assert_eq!(short_type_name("u8"), "u8");
        assert_eq!(short_type_name("alloc::string::String"), "String");
        assert_eq!(
            short_type_name("core::option::Option<alloc::boxed::Box<a::b::C>>"),
            "Option<Box<C>>"
        );
        assert_eq!(short_type_name("(u8, a::B)"), "(u8, B)");
    }

    #[test]
    fn shape_eq() {
        assert_eq!(Shape::of::<u8>(Kind::Uint), Shape::of::<u8>(Kind::Uint));
        assert_ne!(Shape::of::<u8>(Kind::Uint), Shape::of::<u16>(Kind::Uint));
        assert_eq!(Shape::named(Kind::Int, "int"), Shape::named(Kind::Int, "int"));
        assert_ne!(Shape::named(Kind::Int, "int"), Shape::of::<i32>(Kind::Int));
    }
}
