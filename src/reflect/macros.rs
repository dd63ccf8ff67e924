/// Implement [`Reflect`](crate::reflect::Reflect) and [`ToValue`](crate::ToValue) for a record
/// struct.
///
/// List the struct's fields in declaration order. Each field may carry tags as
/// `key = "value"` pairs after a colon, and may be marked `#[embedded]` to take part in
/// [`DecoderConfig::squash`](crate::DecoderConfig::squash). Fields left out of the list are
/// invisible to decoding.
///
/// The struct must be `Clone + Default + Send + Sync + 'static`, and every listed field type must
/// itself be `Reflect`.
///
/// Tag values follow `name[,option...]`: `name` renames the source key, `-` skips the field, and
/// the options are `squash`, `remain` and `omitempty`.
///
/// # Example
/// ```rust
/// use restruct::*;
/// use std::collections::HashMap;
///
/// #[derive(Clone, Default, Debug, PartialEq)]
/// struct Person {
///     name: String,
///     age: u8,
///     other: HashMap<String, Value>,
/// }
///
/// record!(Person {
///     name,
///     age: restruct = "years" json = "age",
///     other: restruct = ",remain",
/// });
///
/// let input = Value::new_map(vec![
///     ("name", Value::from("Mitchell")),
///     ("years", Value::from(91)),
///     ("email", Value::from("mitchell@example.com")),
/// ]);
///
/// let person: Person = input.decode().unwrap();
/// assert_eq!(person.name, "Mitchell");
/// assert_eq!(person.age, 91);
/// assert_eq!(person.other.get("email"), Some(&Value::from("mitchell@example.com")));
/// ```
#[macro_export]
macro_rules! record {
    (@embedded) => { false };
    (@embedded embedded $($rest:ident)*) => { true };
    (@embedded $other:ident $($rest:ident)*) => { $crate::record!(@embedded $($rest)*) };

    ($name:ident {
        $( $(#[$flag:ident])* $field:ident $( : $( $key:ident = $tag:literal )+ )? ),* $(,)?
    }) => {
        impl $crate::reflect::RecordPlace for $name {
            fn fields(&self) -> &'static [$crate::Field] {
                const FIELDS: &[$crate::Field] = &[
                    $(
                        $crate::Field {
                            name: stringify!($field),
                            tags: &[ $( $( (stringify!($key), $tag) ),+ )? ],
                            embedded: $crate::record!(@embedded $($flag)*),
                        }
                    ),*
                ];
                FIELDS
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<&mut dyn $crate::reflect::Reflect> {
                ::std::vec![ $( &mut self.$field as &mut dyn $crate::reflect::Reflect ),* ]
            }
        }

        impl $crate::ToValue for $name {
            fn to_value(&self) -> $crate::Value {
                let values: ::std::vec::Vec<$crate::Value> =
                    ::std::vec![ $( $crate::ToValue::to_value(&self.$field) ),* ];
                let mut rec = $crate::RecordValue::of::<Self>();
                let fields = <Self as $crate::reflect::RecordPlace>::fields(self);
                for (field, value) in fields.iter().zip(values) {
                    rec.push(*field, value);
                }
                $crate::Value::Record(
                    rec.with_native($crate::Native::new(::std::clone::Clone::clone(self))),
                )
            }
        }

        impl $crate::reflect::Reflect for $name {
            fn shape(&self) -> $crate::Shape {
                $crate::Shape::of::<Self>($crate::Kind::Record)
            }

            fn place(&mut self) -> $crate::reflect::Place<'_> {
                $crate::reflect::Place::Record(self)
            }

            fn zero(&mut self) {
                *self = ::std::default::Default::default();
            }

            fn assign(&mut self, native: &$crate::Native) -> bool {
                match native.downcast_ref::<Self>() {
                    ::std::option::Option::Some(v) => {
                        *self = ::std::clone::Clone::clone(v);
                        true
                    }
                    ::std::option::Option::None => false,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::reflect::{Place, RecordPlace, Reflect};
    use crate::*;

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Inner {
        x: i32,
    }

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Outer {
        inner: Inner,
        label: String,
        hidden: u8,
    }

    record!(Inner { x });
    record!(Outer {
        #[embedded] inner: restruct = ",squash",
        label: restruct = "name" json = "label",
        hidden: restruct = "-",
    });

    #[test]
    fn fields_describe_tags() {
        let o = Outer::default();
        let fields = o.fields();

        assert_eq!(fields.len(), 3);
        assert!(fields[0].embedded);
        assert_eq!(fields[0].tag("restruct"), Some(",squash"));
        assert!(!fields[1].embedded);
        assert_eq!(fields[1].tag("json"), Some("label"));
        assert_eq!(fields[2].tag("restruct"), Some("-"));
    }

    #[test]
    fn fields_mut_in_order() {
        let mut o = Outer::default();
        let mut fields = o.fields_mut();
        assert_eq!(fields.len(), 3);
        assert!(fields[1].shape().is::<String>());
        if let Place::Str(s) = fields[1].place() {
            s.push_str("set");
        }
        drop(fields);
        assert_eq!(o.label, "set");
    }

    #[test]
    fn to_value_keeps_native() {
        let o = Outer {
            inner: Inner { x: 3 },
            label: "l".into(),
            hidden: 1,
        };
        let v = o.to_value();
        let rec = v.record().unwrap();

        assert_eq!(rec.get("label"), Some(&Value::from("l")));
        assert_eq!(rec.get("inner").and_then(|i| i.get("x")), Some(&Value::from(3)));
        assert!(rec.native().map(|n| n.is::<Outer>()).unwrap_or(false));

        let mut back = Outer::default();
        assert!(back.assign(rec.native().unwrap()));
        assert_eq!(back, o);
    }
}
