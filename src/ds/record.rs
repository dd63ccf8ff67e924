use super::*;
use std::any::{type_name, Any, TypeId};
use std::cmp::Ordering;

/// A static description of one record field.
///
/// `tags` holds `(key, value)` pairs, the Rust analogue of struct tags. The decoder reads the
/// entry whose key is the configured tag name (`restruct` by default). `embedded` marks a field
/// that contributes its own fields to the parent, which is squashed when
/// [`DecoderConfig::squash`](crate::DecoderConfig::squash) is on.
///
/// Fields are usually declared through the [`record!`](crate::record) macro.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Field {
    pub name: &'static str,
    pub tags: &'static [(&'static str, &'static str)],
    pub embedded: bool,
}

impl Field {
    /// An untagged, non-embedded field.
    pub const fn new(name: &'static str) -> Self {
        Field {
            name,
            tags: &[],
            embedded: false,
        }
    }

    pub const fn with_tags(mut self, tags: &'static [(&'static str, &'static str)]) -> Self {
        self.tags = tags;
        self
    }

    pub const fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// The raw tag under `key`.
    ///
    /// # Example
    /// ```rust
    /// # use restruct::Field;
    /// let f = Field::new("name").with_tags(&[("restruct", "user,omitempty"), ("json", "n")]);
    /// assert_eq!(f.tag("restruct"), Some("user,omitempty"));
    /// assert_eq!(f.tag("json"), Some("n"));
    /// assert_eq!(f.tag("yaml"), None);
    /// ```
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

/// A field paired with its value inside a [`RecordValue`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldValue {
    pub field: Field,
    pub value: Value,
}

/// The dynamic snapshot of a typed record.
///
/// Fields keep their declaration order and tags so a record can be flattened into a map (or
/// decoded into another record type) under the same tag rules that drive decoding. A record
/// produced from a Rust value also keeps a [`Native`] copy of that value, which lets a decode into
/// the same type assign it whole.
///
/// # Example
/// ```rust
/// # use restruct::*;
/// let rec = RecordValue::new("Point")
///     .with_field(Field::new("x"), Value::from(1))
///     .with_field(Field::new("y"), Value::from(2));
///
/// assert_eq!(rec.get("y"), Some(&Value::from(2)));
/// assert_eq!(rec.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct RecordValue {
    name: &'static str,
    id: Option<TypeId>,
    fields: Vec<FieldValue>,
    native: Option<Native>,
}

impl RecordValue {
    /// An empty record with a name but no Rust type identity.
    pub fn new(name: &'static str) -> Self {
        RecordValue {
            name,
            id: None,
            fields: Vec::new(),
            native: None,
        }
    }

    /// An empty record describing the Rust type `T`.
    pub fn of<T: Any>() -> Self {
        RecordValue {
            name: type_name::<T>(),
            id: Some(TypeId::of::<T>()),
            fields: Vec::new(),
            native: None,
        }
    }

    pub fn with_field(mut self, field: Field, value: Value) -> Self {
        self.push(field, value);
        self
    }

    pub fn push(&mut self, field: Field, value: Value) {
        self.fields.push(FieldValue { field, value });
    }

    /// Attach the native copy of the record.
    pub fn with_native(mut self, native: Native) -> Self {
        self.native = Some(native);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> Option<TypeId> {
        self.id
    }

    pub fn fields(&self) -> &[FieldValue] {
        &self.fields
    }

    pub fn native(&self) -> Option<&Native> {
        self.native.as_ref()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The value of the first field named `name` (the Rust field name, not the tag).
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|f| f.field.name == name)
            .map(|f| &f.value)
    }
}

/// Records compare by name then by fields. The native copy does not take part.
impl PartialEq for RecordValue {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

impl Eq for RecordValue {}

impl PartialOrd for RecordValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecordValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(other.name)
            .then_with(|| self.fields.cmp(&other.fields))
    }
}
