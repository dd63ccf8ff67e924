use super::*;
use serde::{ser, Serialize};
use std::fmt;

type Res = Result<Value, EncodeError>;

/// Encoder to pass to [`Serialize::serialize`] to encode a type into a [`Value`].
///
/// There is no data associated with the `Encoder`, instead it is used to implement `serde`'s
/// `Serializer` trait. It can be used to encode a data type that implements [`Serialize`] like
/// so:
/// ```rust
/// # use restruct::*;
/// use restruct::encode::Encoder;
/// use restruct::encode::Serialize;
///
/// let data = ("Hello!", 3.14);
/// let expected = Value::new_seq(vec![Value::from("Hello!"), Value::from(3.14)]);
///
/// let value = data.serialize(Encoder);
/// assert_eq!(value, Ok(expected));
/// ```
///
/// The mapping is lossy where `Value` has no counterpart:
///
/// | serde              | Value                                   |
/// | ------------------ | --------------------------------------- |
/// | unit, `None`       | `Nil`                                   |
/// | `Some(x)`, newtype | `x`                                     |
/// | char               | `Str`                                   |
/// | tuple, seq         | `Seq`                                   |
/// | struct             | `Record` (no native copy)               |
/// | unit variant       | `Str` of the variant name               |
/// | other variants     | `Map` with the variant name as only key |
///
/// [`Serialize`]: crate::encode::Serialize
/// [`Serialize::serialize`]: crate::encode::Serialize::serialize
/// [`Value`]: crate::Value
pub struct Encoder;

impl ser::Serializer for Encoder {
    type Ok = Value;
    type Error = EncodeError;
    type SerializeSeq = SeqLike;
    type SerializeTuple = SeqLike;
    type SerializeTupleStruct = SeqLike;
    type SerializeTupleVariant = Variant<SeqLike>;
    type SerializeMap = MapLike;
    type SerializeStruct = RecordLike;
    type SerializeStructVariant = Variant<RecordLike>;

    fn serialize_bool(self, v: bool) -> Res {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_i16(self, v: i16) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_i32(self, v: i32) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_i64(self, v: i64) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_i128(self, v: i128) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_u8(self, v: u8) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_u16(self, v: u16) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_u32(self, v: u32) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_u64(self, v: u64) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_u128(self, v: u128) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_f32(self, v: f32) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_f64(self, v: f64) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_char(self, v: char) -> Res {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Res {
        Ok(Value::new_bytes(v))
    }

    fn serialize_none(self) -> Res {
        Ok(Value::Nil)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, v: &T) -> Res {
        v.serialize(self)
    }

    fn serialize_unit(self) -> Res {
        Ok(Value::Nil)
    }

    fn serialize_unit_struct(self, _: &'static str) -> Res {
        Ok(Value::Nil)
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, variant: &'static str) -> Res {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _: &'static str, value: &T) -> Res {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        value: &T,
    ) -> Res {
        Ok(Value::new_map(vec![(variant, value.serialize(self)?)]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqLike, EncodeError> {
        Ok(SeqLike {
            items: Vec::with_capacity(len.unwrap_or_default()),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqLike, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _: &'static str, len: usize) -> Result<SeqLike, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Variant<SeqLike>, EncodeError> {
        Ok(Variant {
            name: variant,
            inner: self.serialize_seq(Some(len))?,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapLike, EncodeError> {
        Ok(MapLike {
            key: None,
            map: Map::new(),
        })
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<RecordLike, EncodeError> {
        Ok(RecordLike {
            record: RecordValue::new(name),
        })
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        _: usize,
    ) -> Result<Variant<RecordLike>, EncodeError> {
        Ok(Variant {
            name: variant,
            inner: RecordLike {
                record: RecordValue::new(variant),
            },
        })
    }

    fn collect_str<T: ?Sized + fmt::Display>(self, value: &T) -> Res {
        self.serialize_str(&value.to_string())
    }
}

/// `Value` encoding error.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum EncodeError {
    /// An implementor of `Serialize` called `serialize_value` on a map before `serialize_key`.
    #[error("no key was available when trying to serialize map value")]
    NoKeyAvailable,
    /// Some `Serialize` implementor error occurred.
    #[error("custom error: {0}")]
    Message(String),
}

impl ser::Error for EncodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        EncodeError::Message(msg.to_string())
    }
}

// ********************* SEQUENCES *********************************************
pub struct SeqLike {
    items: Vec<Value>,
}

impl SeqLike {
    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.items.push(value.serialize(Encoder)?);
        Ok(())
    }
}

impl ser::SerializeSeq for SeqLike {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.push(value)
    }

    fn end(self) -> Res {
        Ok(Value::Seq(self.items))
    }
}

impl ser::SerializeTuple for SeqLike {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.push(value)
    }

    fn end(self) -> Res {
        Ok(Value::Seq(self.items))
    }
}

impl ser::SerializeTupleStruct for SeqLike {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.push(value)
    }

    fn end(self) -> Res {
        Ok(Value::Seq(self.items))
    }
}

// ********************* MAPS **************************************************
pub struct MapLike {
    key: Option<Value>,
    map: Map,
}

impl ser::SerializeMap for MapLike {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), EncodeError> {
        self.key = Some(key.serialize(Encoder)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        let key = self.key.take().ok_or(EncodeError::NoKeyAvailable)?;
        self.map.insert(key, value.serialize(Encoder)?);
        Ok(())
    }

    fn serialize_entry<K, V>(&mut self, key: &K, value: &V) -> Result<(), EncodeError>
    where
        K: ?Sized + Serialize,
        V: ?Sized + Serialize,
    {
        self.map
            .insert(key.serialize(Encoder)?, value.serialize(Encoder)?);
        Ok(())
    }

    fn end(self) -> Res {
        Ok(Value::Map(self.map))
    }
}

// ********************* RECORDS ***********************************************
pub struct RecordLike {
    record: RecordValue,
}

impl RecordLike {
    fn push<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.record.push(Field::new(key), value.serialize(Encoder)?);
        Ok(())
    }
}

impl ser::SerializeStruct for RecordLike {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.push(key, value)
    }

    fn end(self) -> Res {
        Ok(Value::Record(self.record))
    }
}

// ********************* VARIANTS **********************************************
/// A tuple or struct variant, encoded as `{ variant: inner }`.
pub struct Variant<T> {
    name: &'static str,
    inner: T,
}

impl ser::SerializeTupleVariant for Variant<SeqLike> {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.inner.push(value)
    }

    fn end(self) -> Res {
        Ok(Value::new_map(vec![(self.name, Value::Seq(self.inner.items))]))
    }
}

impl ser::SerializeStructVariant for Variant<RecordLike> {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.inner.push(key, value)
    }

    fn end(self) -> Res {
        Ok(Value::new_map(vec![(
            self.name,
            Value::Record(self.inner.record),
        )]))
    }
}
