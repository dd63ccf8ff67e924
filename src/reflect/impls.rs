use super::*;
use crate::shape::Kind;
use std::collections::{BTreeMap, HashMap};
use std::convert::TryFrom;
use std::hash::{BuildHasher, Hash};

/// Assign through a native of exactly `Self`.
macro_rules! assign_native {
    () => {
        fn assign(&mut self, native: &Native) -> bool {
            match native.downcast_ref::<Self>() {
                Some(v) => {
                    *self = v.clone();
                    true
                }
                None => false,
            }
        }
    };
}

// ********************* SCALARS **********************************************

macro_rules! int {
    ( $place:ident $variant:ident $kind:ident $wide:ty; $( $t:ty ) * ) => {
        $(
            impl $place for $t {
                fn bits(&self) -> u32 {
                    <$t>::BITS
                }

                fn set(&mut self, value: $wide) -> bool {
                    match <$t>::try_from(value) {
                        Ok(x) => {
                            *self = x;
                            true
                        }
                        Err(_) => false,
                    }
                }
            }

            impl Reflect for $t {
                fn shape(&self) -> Shape {
                    Shape::of::<$t>(Kind::$kind)
                }

                fn place(&mut self) -> Place<'_> {
                    Place::$variant(self)
                }

                fn zero(&mut self) {
                    *self = 0;
                }

                assign_native!();
            }
        )*
    };
}

int!(IntPlace Int Int i128; isize i8 i16 i32 i64 i128);
int!(UintPlace Uint Uint u128; usize u8 u16 u32 u64 u128);

macro_rules! float {
    ( $( $t:ty ) * ) => {
        $(
            impl FloatPlace for $t {
                fn bits(&self) -> u32 {
                    (std::mem::size_of::<$t>() * 8) as u32
                }

                fn set(&mut self, value: f64) {
                    *self = value as $t;
                }
            }

            impl Reflect for $t {
                fn shape(&self) -> Shape {
                    Shape::of::<$t>(Kind::Float)
                }

                fn place(&mut self) -> Place<'_> {
                    Place::Float(self)
                }

                fn zero(&mut self) {
                    *self = 0.0;
                }

                assign_native!();
            }
        )*
    };
}

float!(f32 f64);

impl Reflect for bool {
    fn shape(&self) -> Shape {
        Shape::of::<bool>(Kind::Bool)
    }

    fn place(&mut self) -> Place<'_> {
        Place::Bool(self)
    }

    fn zero(&mut self) {
        *self = false;
    }

    assign_native!();
}

impl Reflect for String {
    fn shape(&self) -> Shape {
        Shape::of::<String>(Kind::String)
    }

    fn place(&mut self) -> Place<'_> {
        Place::Str(self)
    }

    fn zero(&mut self) {
        self.clear();
    }

    assign_native!();
}

impl Reflect for Value {
    fn shape(&self) -> Shape {
        Shape::of::<Value>(Kind::Dynamic)
    }

    fn place(&mut self) -> Place<'_> {
        Place::Dynamic(self)
    }

    fn zero(&mut self) {
        *self = Value::Nil;
    }

    assign_native!();
}

/// `()` has no decode rule: decoding anything but nil into it fails.
impl Reflect for () {
    fn shape(&self) -> Shape {
        Shape::of::<()>(Kind::Unit)
    }

    fn place(&mut self) -> Place<'_> {
        Place::Unit
    }

    fn zero(&mut self) {}

    fn assign(&mut self, native: &Native) -> bool {
        native.is::<()>()
    }
}

// ********************* SEQUENCES ********************************************

impl<T> SeqPlace for Vec<T>
where
    T: Reflect + Default + Clone,
{
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn elem_shape(&self) -> Shape {
        T::default().shape()
    }

    fn clear(&mut self) {
        Vec::clear(self)
    }

    fn resize(&mut self, len: usize) {
        Vec::resize_with(self, len, T::default)
    }

    fn elem_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        self.get_mut(index).map(|x| x as &mut dyn Reflect)
    }
}

impl<T> Reflect for Vec<T>
where
    T: Reflect + Default + Clone,
{
    fn shape(&self) -> Shape {
        Shape::of::<Self>(Kind::Seq)
    }

    fn place(&mut self) -> Place<'_> {
        Place::Seq(self)
    }

    fn zero(&mut self) {
        Vec::clear(self)
    }

    assign_native!();
}

impl<T, const N: usize> SeqPlace for [T; N]
where
    T: Reflect + Default + Clone,
{
    fn len(&self) -> usize {
        N
    }

    fn elem_shape(&self) -> Shape {
        T::default().shape()
    }

    fn clear(&mut self) {
        self.iter_mut().for_each(|x| *x = T::default());
    }

    fn resize(&mut self, _: usize) {}

    fn elem_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        self.get_mut(index).map(|x| x as &mut dyn Reflect)
    }
}

impl<T, const N: usize> Reflect for [T; N]
where
    T: Reflect + Default + Clone,
{
    fn shape(&self) -> Shape {
        Shape::of::<Self>(Kind::Array)
    }

    fn place(&mut self) -> Place<'_> {
        Place::Array(self)
    }

    fn zero(&mut self) {
        SeqPlace::clear(self)
    }

    assign_native!();
}

// ********************* MAPS *************************************************

impl<K, V, S> MapPlace for HashMap<K, V, S>
where
    K: Reflect + Default + Clone + Eq + Hash,
    V: Reflect + Default + Clone,
    S: BuildHasher + Default + Clone + 'static,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn clear(&mut self) {
        HashMap::clear(self)
    }

    fn insert_with(&mut self, fill: &mut FillEntry<'_>) -> Result<(), DecodeErrors> {
        let mut k = K::default();
        let mut v = V::default();
        fill(&mut k, &mut v)?;
        self.insert(k, v);
        Ok(())
    }
}

impl<K, V, S> Reflect for HashMap<K, V, S>
where
    K: Reflect + Default + Clone + Eq + Hash,
    V: Reflect + Default + Clone,
    S: BuildHasher + Default + Clone + 'static,
{
    fn shape(&self) -> Shape {
        Shape::of::<Self>(Kind::Map)
    }

    fn place(&mut self) -> Place<'_> {
        Place::Map(self)
    }

    fn zero(&mut self) {
        HashMap::clear(self)
    }

    assign_native!();
}

impl<K, V> MapPlace for BTreeMap<K, V>
where
    K: Reflect + Default + Clone + Ord,
    V: Reflect + Default + Clone,
{
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn clear(&mut self) {
        BTreeMap::clear(self)
    }

    fn insert_with(&mut self, fill: &mut FillEntry<'_>) -> Result<(), DecodeErrors> {
        let mut k = K::default();
        let mut v = V::default();
        fill(&mut k, &mut v)?;
        self.insert(k, v);
        Ok(())
    }
}

impl<K, V> Reflect for BTreeMap<K, V>
where
    K: Reflect + Default + Clone + Ord,
    V: Reflect + Default + Clone,
{
    fn shape(&self) -> Shape {
        Shape::of::<Self>(Kind::Map)
    }

    fn place(&mut self) -> Place<'_> {
        Place::Map(self)
    }

    fn zero(&mut self) {
        BTreeMap::clear(self)
    }

    assign_native!();
}

// ********************* POINTERS *********************************************

impl<T> PtrPlace for Option<T>
where
    T: Reflect + Default + Clone,
{
    fn set_null(&mut self) {
        *self = None;
    }

    fn pointee_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(|x| x as &mut dyn Reflect)
    }

    fn fill(&mut self, fresh: bool, fill: &mut FillPointee<'_>) -> Result<(), DecodeErrors> {
        if !fresh {
            if let Some(x) = self.as_mut() {
                return fill(x);
            }
        }
        let mut x = T::default();
        fill(&mut x)?;
        *self = Some(x);
        Ok(())
    }
}

impl<T> Reflect for Option<T>
where
    T: Reflect + Default + Clone,
{
    fn shape(&self) -> Shape {
        Shape::of::<Self>(Kind::Ptr)
    }

    fn place(&mut self) -> Place<'_> {
        Place::Ptr(self)
    }

    fn zero(&mut self) {
        *self = None;
    }

    assign_native!();
}

impl<T> PtrPlace for Box<T>
where
    T: Reflect + Default + Clone,
{
    fn set_null(&mut self) {
        **self = T::default();
    }

    fn pointee_mut(&mut self) -> Option<&mut dyn Reflect> {
        Some(&mut **self as &mut dyn Reflect)
    }

    fn fill(&mut self, fresh: bool, fill: &mut FillPointee<'_>) -> Result<(), DecodeErrors> {
        if fresh {
            let mut x = T::default();
            fill(&mut x)?;
            **self = x;
            Ok(())
        } else {
            fill(&mut **self)
        }
    }
}

impl<T> Reflect for Box<T>
where
    T: Reflect + Default + Clone,
{
    fn shape(&self) -> Shape {
        Shape::of::<Self>(Kind::Ptr)
    }

    fn place(&mut self) -> Place<'_> {
        Place::Ptr(self)
    }

    fn zero(&mut self) {
        **self = T::default();
    }

    fn assign(&mut self, native: &Native) -> bool {
        if let Some(v) = native.downcast_ref::<Self>() {
            *self = v.clone();
            true
        } else if let Some(v) = native.downcast_ref::<T>() {
            **self = v.clone();
            true
        } else {
            false
        }
    }
}

// ********************* OPAQUE ***********************************************

/// A destination for values that have no dynamic representation, such as callables or handles.
///
/// An `Opaque<T>` only accepts a [`Native`] holding exactly a `T` (or an `Opaque<T>`). Anything
/// else is an unexpected type error.
///
/// # Example
/// ```rust
/// # use restruct::*;
/// use std::sync::Arc;
///
/// type Callback = Arc<dyn Fn(u32) -> u32 + Send + Sync>;
///
/// let double: Callback = Arc::new(|x| x * 2);
/// let mut out = Opaque::<Callback>::default();
///
/// decode(&Value::Native(Native::new(double)), &mut out).unwrap();
/// assert_eq!(out.get().map(|f| f(21)), Some(42));
///
/// assert!(decode(&Value::from(1), &mut out).is_err());
/// ```
#[derive(Clone)]
pub struct Opaque<T>(pub Option<T>);

impl<T> Opaque<T> {
    pub fn new(value: T) -> Self {
        Opaque(Some(value))
    }

    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T> Default for Opaque<T> {
    fn default() -> Self {
        Opaque(None)
    }
}

impl<T> std::fmt::Debug for Opaque<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = crate::shape::short_type_name(std::any::type_name::<T>());
        match self.0 {
            Some(_) => write!(f, "Opaque({})", name),
            None => write!(f, "Opaque(None)"),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> ToValue for Opaque<T> {
    fn to_value(&self) -> Value {
        match &self.0 {
            Some(x) => Value::Native(Native::new(x.clone())),
            None => Value::Nil,
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Reflect for Opaque<T> {
    fn shape(&self) -> Shape {
        Shape::of::<T>(Kind::Opaque)
    }

    fn place(&mut self) -> Place<'_> {
        Place::Opaque
    }

    fn zero(&mut self) {
        self.0 = None;
    }

    fn assign(&mut self, native: &Native) -> bool {
        if let Some(v) = native.downcast_ref::<T>() {
            self.0 = Some(v.clone());
            true
        } else if let Some(v) = native.downcast_ref::<Self>() {
            self.0 = v.0.clone();
            true
        } else {
            false
        }
    }
}
