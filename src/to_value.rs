use crate::ds::{Map, Native, Value};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// _Convert_ something into a [`Value`], the reverse direction of decoding.
///
/// `ToValue` takes the object by reference and always succeeds. It is a supertrait of
/// [`Reflect`](crate::reflect::Reflect): every decode destination can also be read back as a
/// `Value`, which is how errors capture a snapshot of the destination and how a record flattens
/// into a map.
///
/// Records declared with [`record!`](crate::record) implement `ToValue` as a
/// [`Value::Record`] carrying their field tags.
///
/// # Implementing
/// ```rust
/// use restruct::*;
///
/// struct Celsius(f64);
///
/// impl ToValue for Celsius {
///     fn to_value(&self) -> Value {
///         Value::new_str(format!("{}C", self.0))
///     }
/// }
///
/// assert_eq!(Celsius(21.5).to_value(), Value::from("21.5C"));
/// assert_eq!(vec![Celsius(1.0)].to_value(), Value::new_seq(vec!["1C"]));
/// ```
pub trait ToValue {
    /// Convert `self` into a `Value`.
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for Native {
    fn to_value(&self) -> Value {
        Value::Native(self.clone())
    }
}

#[cfg(test)]
use rand::Rng;
#[cfg(test)]
fn random_string() -> String {
    let mut rng = rand::thread_rng();
    let len = rng.gen::<u8>() as usize;
    (0..len).map(|_| rng.gen::<char>()).collect()
}

#[test]
fn test_value_to_value() {
    let value = Value::new_seq(vec![
        Value::from(random_string()),
        Value::from(rand::random::<usize>()),
    ]);
    assert_eq!(value.to_value(), value);
}

// ********************* COPY-ABLE PRIMITIVES *********************************

macro_rules! number {
    ( $( $x:ty ) * ) => {
        $(
            impl ToValue for $x {
                fn to_value(&self) -> Value {
                    Value::new_num(*self)
                }
            }
        )*
    }
}

number!(
    usize u8 u16 u32 u64 u128
    isize i8 i16 i32 i64 i128
    f32 f64
);

impl ToValue for () {
    fn to_value(&self) -> Value {
        Value::Nil
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

#[test]
fn test_copyable_primitives() {
    assert_eq!(123456u32.to_value(), Value::new_num(123456));
    assert_eq!((-1234567i64).to_value(), Value::new_num(-1234567));
    assert_eq!(3.14f64.to_value(), Value::new_num(3.14));
    assert_eq!(().to_value(), Value::Nil);
    assert_eq!(true.to_value(), Value::Bool(true));
    assert_eq!('y'.to_value(), Value::new_str("y"));
}

// ********************* STRINGS **********************************************

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

#[test]
fn test_strings() {
    let s = random_string();
    assert_eq!(s.to_value(), Value::Str(s.clone()));
    assert_eq!("Hello".to_value(), Value::new_str("Hello"));
}

// ********************* SEQUENCES ********************************************

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(ToValue::to_value).collect())
    }
}

#[test]
fn test_sequences() {
    assert_eq!(vec![1u8, 2, 3].to_value(), Value::new_seq(vec![1, 2, 3]));
    assert_eq!(["a", "b"].to_value(), Value::new_seq(vec!["a", "b"]));
    assert_eq!(Vec::<u8>::new().to_value(), Value::Seq(vec![]));
}

// ********************* MAPS *************************************************

impl<K: ToValue, V: ToValue, S: BuildHasher> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect::<Map>(),
        )
    }
}

impl<K: ToValue, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }
}

#[test]
fn test_maps() {
    let mut map = HashMap::new();
    map.insert("one", 1);
    map.insert("two", 2);
    assert_eq!(
        map.to_value(),
        Value::new_map(vec![("one", 1), ("two", 2)])
    );
}

// ********************* BLANKET IMPLS ****************************************

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

/// `None` becomes [`Value::Nil`]; `Some` values are not wrapped.
impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(x) => x.to_value(),
            None => Value::Nil,
        }
    }
}

#[test]
fn blanket_impls_tests() {
    let boxed = Box::new(String::from("Hello, world!"));
    assert_eq!(boxed.to_value(), Value::new_str("Hello, world!"));

    let option = Some(String::from("Hello, world!"));
    assert_eq!(option.to_value(), Value::new_str("Hello, world!"));
    let option: Option<String> = None;
    assert_eq!(option.to_value(), Value::Nil);
}
