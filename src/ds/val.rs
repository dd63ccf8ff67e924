use super::*;
use crate::shape::{short_type_name, Kind, Shape};
use std::cmp::Ordering;
use std::fmt;

/// A loosely-typed source value.
///
/// `Value` is what the decoder reads from: the kind of tree that arrives from a JSON document, a
/// configuration file or a query string. Primitives (nil, booleans, numbers, strings, byte
/// arrays) act as leaves; sequences, maps and records nest.
///
/// _Maps_ are backed by [`BTreeMap`](std::collections::BTreeMap), keyed by `Value`, so iteration
/// order is deterministic and any value can act as a key. _Records_ are snapshots of typed Rust
/// structures (see [`RecordValue`]). _Natives_ carry opaque Rust values.
///
/// `Eq` and `Ord` are total: variants order as listed, and numbers compare canonically across
/// families (`Value::from(1u8) == Value::from(1.0)`).
///
/// # Examples
/// ```rust
/// # use restruct::*;
/// let val = Value::new_map(vec![
///     ("name", Value::from("Mitchell")),
///     ("age", Value::from(91)),
/// ]);
///
/// assert_eq!(val.get("name").and_then(Value::str), Some("Mitchell"));
/// assert_eq!(val.get("age").and_then(Value::int), Some(91));
/// assert_eq!(val.kind(), Kind::Map);
/// ```
#[derive(Clone)]
pub enum Value {
    /// The absence of a value.
    Nil,
    /// A boolean value.
    Bool(bool),
    /// A numerical value. See [`Number`].
    Num(Number),
    /// A string value.
    Str(String),
    /// A byte array value.
    Bytes(Vec<u8>),
    /// A sequence of values.
    Seq(Vec<Value>),
    /// A mapping of keys to values.
    Map(Map),
    /// A typed record snapshot.
    Record(RecordValue),
    /// An opaque Rust value.
    Native(Native),
}

impl Default for Value {
    fn default() -> Self {
        Value::Nil
    }
}

/// Constructors.
impl Value {
    /// A new number value from any Rust number.
    ///
    /// # Example
    /// ```rust
    /// # use restruct::*;
    /// assert_eq!(Value::new_num(123456u32).uint(), Some(123456));
    /// assert_eq!(Value::new_num(-12).int(), Some(-12));
    /// assert_eq!(Value::new_num(3.14).float(), Some(3.14));
    /// ```
    pub fn new_num<T: Into<Number>>(value: T) -> Self {
        Value::Num(value.into())
    }

    /// A new string value.
    pub fn new_str<S: Into<String>>(string: S) -> Self {
        Value::Str(string.into())
    }

    /// A new byte array value.
    pub fn new_bytes<B: Into<Vec<u8>>>(bytes: B) -> Self {
        Value::Bytes(bytes.into())
    }

    /// A new sequence from anything convertible into values.
    ///
    /// # Example
    /// ```rust
    /// # use restruct::*;
    /// let value = Value::new_seq(vec![1, 2, 3]);
    /// assert_eq!(value.seq().map(|s| s.len()), Some(3));
    /// ```
    pub fn new_seq<I, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Seq(iter.into_iter().map(Into::into).collect())
    }

    /// A new map from key-value pairs. Later duplicates overwrite earlier keys.
    ///
    /// # Example
    /// ```rust
    /// # use restruct::*;
    /// let value = Value::new_map(vec![(1, "one"), (2, "two")]);
    /// assert_eq!(value.map().and_then(|m| m.get(&Value::from(2))), Some(&Value::from("two")));
    /// ```
    pub fn new_map<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Classification.
impl Value {
    /// The canonical kind of the value.
    ///
    /// Byte arrays classify as sequences, natives as opaque.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Invalid,
            Value::Bool(_) => Kind::Bool,
            Value::Num(Number::Uint(_)) => Kind::Uint,
            Value::Num(Number::Int(_)) => Kind::Int,
            Value::Num(Number::Float(_)) => Kind::Float,
            Value::Str(_) => Kind::String,
            Value::Bytes(_) | Value::Seq(_) => Kind::Seq,
            Value::Map(_) => Kind::Map,
            Value::Record(_) => Kind::Record,
            Value::Native(_) => Kind::Opaque,
        }
    }

    /// The name of the value's type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Num(n) => n.family(),
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Seq(_) => "seq",
            Value::Map(_) => "map",
            Value::Record(r) => r.name(),
            Value::Native(n) => n.type_name(),
        }
    }

    /// The shape of the value, handed to decode hooks as the _from_ shape.
    ///
    /// Records and natives carry the identity of the Rust type behind them.
    pub fn shape(&self) -> Shape {
        match self {
            Value::Record(r) => match r.native() {
                Some(n) => Shape::from_native(Kind::Record, n),
                None => Shape::named(Kind::Record, r.name()),
            },
            Value::Native(n) => Shape::from_native(Kind::Opaque, n),
            v => Shape::named(v.kind(), v.type_name()),
        }
    }

    /// The native copy behind the value, either a `Native` or a record that kept its original.
    pub fn native(&self) -> Option<&Native> {
        match self {
            Value::Native(n) => Some(n),
            Value::Record(r) => r.native(),
            _ => None,
        }
    }

    /// The value is the zero value of its kind: nil, `false`, zero, or an empty string,
    /// byte array, sequence or map. Records and natives are never empty.
    ///
    /// # Example
    /// ```rust
    /// # use restruct::*;
    /// assert!(Value::Nil.is_empty_value());
    /// assert!(Value::from(0.0).is_empty_value());
    /// assert!(Value::from("").is_empty_value());
    /// assert!(!Value::from("a").is_empty_value());
    /// ```
    pub fn is_empty_value(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Bool(b) => !b,
            Value::Num(n) => n.is_zero(),
            Value::Str(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            Value::Seq(s) => s.is_empty(),
            Value::Map(m) => m.is_empty(),
            Value::Record(_) | Value::Native(_) => false,
        }
    }
}

/// Convenience methods for accessing values straight from the [`Value`] enum.
impl Value {
    /// `Value` is [`Value::Nil`].
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as an unsigned integer, if it is a number that fits.
    ///
    /// # Example
    /// ```rust
    /// # use restruct::*;
    /// assert_eq!(Value::from(12.0).uint(), Some(12));
    /// assert_eq!(Value::from(-12).uint(), None);
    /// ```
    pub fn uint(&self) -> Option<u128> {
        match self {
            Value::Num(n) => n.as_u128().ok(),
            _ => None,
        }
    }

    /// The value as a signed integer, if it is a number that fits.
    pub fn int(&self) -> Option<i128> {
        match self {
            Value::Num(n) => n.as_i128().ok(),
            _ => None,
        }
    }

    /// The value as a float, if it is a number.
    pub fn float(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    pub fn seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(s) => Some(s.as_slice()),
            _ => None,
        }
    }

    pub fn seq_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }

    pub fn map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn record(&self) -> Option<&RecordValue> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Look up a string key in a map, or a field name in a record.
    ///
    /// # Example
    /// ```rust
    /// # use restruct::*;
    /// let map = Value::new_map(vec![("a", 1)]);
    /// assert_eq!(map.get("a"), Some(&Value::from(1)));
    /// assert_eq!(map.get("b"), None);
    /// assert_eq!(Value::from(1).get("a"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(m) => m.get(&Value::from(key)),
            Value::Record(r) => r.get(key),
            _ => None,
        }
    }
}

impl Value {
    fn rank(&self) -> u8 {
        match self {
            Value::Nil => 0,
            Value::Bool(_) => 1,
            Value::Num(_) => 2,
            Value::Str(_) => 3,
            Value::Bytes(_) => 4,
            Value::Seq(_) => 5,
            Value::Map(_) => 6,
            Value::Record(_) => 7,
            Value::Native(_) => 8,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        match (self, other) {
            (Nil, Nil) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Num(a), Num(b)) => a.cmp(b),
            (Str(a), Str(b)) => a.cmp(b),
            (Bytes(a), Bytes(b)) => a.cmp(b),
            (Seq(a), Seq(b)) => a.cmp(b),
            (Map(a), Map(b)) => a.cmp(b),
            (Record(a), Record(b)) => a.cmp(b),
            (Native(a), Native(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::Num(v) => write!(f, "Num({:?})", v),
            Value::Str(v) => write!(f, "Str({:?})", v),
            Value::Bytes(v) => write!(f, "Bytes({:?})", v),
            Value::Seq(v) => f.debug_list().entries(v.iter()).finish(),
            Value::Map(v) => f.debug_map().entries(v.iter()).finish(),
            Value::Record(r) => {
                let name = short_type_name(r.name());
                let mut d = f.debug_struct(&name);
                for fv in r.fields() {
                    d.field(fv.field.name, &fv.value);
                }
                d.finish()
            }
            Value::Native(n) => write!(f, "{:?}", n),
        }
    }
}

/// A compact rendering used in error messages and namespaces.
///
/// Strings print raw, sequences as `[a b]`, maps as `map[k:v]`, records as `{a b}`.
///
/// # Example
/// ```rust
/// # use restruct::*;
/// assert_eq!(Value::from("abc").to_string(), "abc");
/// assert_eq!(Value::new_seq(vec![1, 2]).to_string(), "[1 2]");
/// assert_eq!(Value::new_map(vec![("a", true)]).to_string(), "map[a:true]");
/// ```
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn list<I, D>(f: &mut fmt::Formatter, open: &str, items: I, close: &str) -> fmt::Result
        where
            I: Iterator<Item = D>,
            D: fmt::Display,
        {
            f.write_str(open)?;
            for (i, item) in items.enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", item)?;
            }
            f.write_str(close)
        }

        match self {
            Value::Nil => f.write_str("<nil>"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Num(v) => write!(f, "{}", v),
            Value::Str(v) => f.write_str(v),
            Value::Bytes(v) => list(f, "[", v.iter(), "]"),
            Value::Seq(v) => list(f, "[", v.iter(), "]"),
            Value::Map(m) => list(
                f,
                "map[",
                m.iter().map(|(k, v)| format!("{}:{}", k, v)),
                "]",
            ),
            Value::Record(r) => list(f, "{", r.fields().iter().map(|fv| &fv.value), "}"),
            Value::Native(n) => write!(f, "<{}>", short_type_name(n.type_name())),
        }
    }
}

// ########### CONVERSIONS ####################################################
macro_rules! from_num {
    ( $( $t:ty ),* ) => {
	$(
	impl From<$t> for Value {
	    fn from(x: $t) -> Self {
		Value::Num(x.into())
	    }
	}
	)*
    };
}

from_num!(usize, u8, u16, u32, u64, u128, isize, i8, i16, i32, i64, i128, f32, f64);

impl From<Number> for Value {
    fn from(x: Number) -> Self {
        Value::Num(x)
    }
}

impl From<bool> for Value {
    fn from(x: bool) -> Self {
        Value::Bool(x)
    }
}

impl From<&str> for Value {
    fn from(x: &str) -> Self {
        Value::Str(x.to_string())
    }
}

impl From<String> for Value {
    fn from(x: String) -> Self {
        Value::Str(x)
    }
}

impl From<Vec<Value>> for Value {
    fn from(x: Vec<Value>) -> Self {
        Value::Seq(x)
    }
}

impl From<Map> for Value {
    fn from(x: Map) -> Self {
        Value::Map(x)
    }
}

impl From<RecordValue> for Value {
    fn from(x: RecordValue) -> Self {
        Value::Record(x)
    }
}

impl From<Native> for Value {
    fn from(x: Native) -> Self {
        Value::Native(x)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(x: Option<T>) -> Self {
        x.map(Into::into).unwrap_or(Value::Nil)
    }
}
