//! Paths to a location inside a decoded value.
use crate::ds::Value;
use std::borrow::Cow;
use std::fmt;

/// One step of a [`Namespace`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// A record field. `name` is the Rust field name, `key` the name it is matched under in the
    /// source (the tag name when one is set).
    Field {
        name: Cow<'static, str>,
        key: Cow<'static, str>,
    },
    /// A map key, in its display form.
    Key(String),
    /// A sequence or array index.
    Index(usize),
}

/// The path from the decode root to the node being decoded.
///
/// Namespaces are immutable: appending returns a new path and never alters the receiver, so a
/// parent's path can be shared by all of its children.
///
/// Rendering puts `.` between field segments and wraps keys and indices in brackets, with no
/// delimiter before the first segment. The [`Display`](fmt::Display) form names fields by their
/// Rust name and is what errors show; [`Namespace::key_path`] names them by their source key and
/// is what [`Metadata`](crate::Metadata) records.
///
/// # Example
/// ```rust
/// # use restruct::*;
/// let root = Namespace::new();
/// let ns = root
///     .field("vehicle", "Vehicle")
///     .key(&Value::from("wheels"))
///     .index(2)
///     .field("size", "Size");
///
/// assert_eq!(ns.to_string(), "vehicle[wheels][2].size");
/// assert_eq!(ns.key_path(), "Vehicle[wheels][2].Size");
/// assert!(root.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Namespace {
    segments: Vec<Segment>,
}

impl Namespace {
    /// The root path.
    pub fn new() -> Self {
        Namespace::default()
    }

    /// A new path with a field segment appended.
    pub fn field<N, K>(&self, name: N, key: K) -> Self
    where
        N: Into<Cow<'static, str>>,
        K: Into<Cow<'static, str>>,
    {
        self.with(Segment::Field {
            name: name.into(),
            key: key.into(),
        })
    }

    /// A new path with a map key segment appended.
    pub fn key(&self, key: &Value) -> Self {
        self.with(Segment::Key(key.to_string()))
    }

    /// A new path with an index segment appended.
    pub fn index(&self, index: usize) -> Self {
        self.with(Segment::Index(index))
    }

    fn with(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Namespace { segments }
    }

    /// Put `prefix` in front of this path, in place.
    pub fn prepend(&mut self, prefix: &Namespace) {
        if !prefix.is_empty() {
            self.segments.splice(0..0, prefix.segments.iter().cloned());
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render the path naming fields by their source key.
    pub fn key_path(&self) -> String {
        let mut s = String::new();
        self.render(&mut s, true);
        s
    }

    fn render(&self, out: &mut String, by_key: bool) {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field { name, key } => {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(if by_key { key } else { name });
                }
                Segment::Key(k) => {
                    out.push('[');
                    out.push_str(k);
                    out.push(']');
                }
                Segment::Index(idx) => {
                    out.push('[');
                    out.push_str(&idx.to_string());
                    out.push(']');
                }
            }
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = String::new();
        self.render(&mut s, false);
        f.write_str(&s)
    }
}
