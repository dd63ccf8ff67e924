use bitflags::bitflags;

bitflags! {
    /// Options following the name in a field tag.
    #[derive(Default)]
    pub struct TagFlags: u8 {
        /// Lift the field's own fields into the parent record.
        const SQUASH    = 0b0001;
        /// Receive every source key no other field consumed.
        const REMAIN    = 0b0010;
        /// Leave the field out of a flattened map when it holds its zero value.
        const OMITEMPTY = 0b0100;
    }
}

/// A parsed field tag: `name[,option...]`, or `-` to skip the field.
///
/// An empty name means the field keeps its Rust name. Unknown options are ignored.
///
/// # Example
/// ```rust
/// # use restruct::reflect::{Tag, TagFlags};
/// let tag = Tag::parse("user,omitempty");
/// assert_eq!(tag.name, Some("user"));
/// assert!(tag.flags.contains(TagFlags::OMITEMPTY));
///
/// let tag = Tag::parse(",squash");
/// assert_eq!(tag.name, None);
/// assert!(tag.flags.contains(TagFlags::SQUASH));
///
/// assert!(Tag::parse("-").skip);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tag {
    pub name: Option<&'static str>,
    pub skip: bool,
    pub flags: TagFlags,
}

impl Tag {
    pub fn parse(raw: &'static str) -> Self {
        let mut parts = raw.split(',');
        let name = parts.next().unwrap_or("").trim();

        if name == "-" {
            return Tag {
                skip: true,
                ..Tag::default()
            };
        }

        let flags = parts.fold(TagFlags::empty(), |flags, opt| {
            flags
                | match opt.trim() {
                    "squash" => TagFlags::SQUASH,
                    "remain" => TagFlags::REMAIN,
                    "omitempty" => TagFlags::OMITEMPTY,
                    _ => TagFlags::empty(),
                }
        });

        Tag {
            name: if name.is_empty() { None } else { Some(name) },
            skip: false,
            flags,
        }
    }

    pub fn squash(&self) -> bool {
        self.flags.contains(TagFlags::SQUASH)
    }

    pub fn remain(&self) -> bool {
        self.flags.contains(TagFlags::REMAIN)
    }

    pub fn omitempty(&self) -> bool {
        self.flags.contains(TagFlags::OMITEMPTY)
    }
}
