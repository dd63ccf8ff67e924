//! Records: decoding from maps and flattening into maps.
use super::engine::{node_error, Walker};
use crate::ds::{Field, Map, RecordValue, Value};
use crate::error::{DecodeError, DecodeErrors, ErrorKind};
use crate::ns::Namespace;
use crate::reflect::{Place, RecordPlace, Reflect, Tag};
use crate::shape::Kind;
use std::collections::{BTreeSet, VecDeque};

/// A destination field after squashed records have been expanded.
struct Target<'a> {
    field: Field,
    key: &'static str,
    slot: &'a mut dyn Reflect,
}

impl<'s, 'm> Walker<'s, 'm> {
    pub(super) fn decode_record(
        &mut self,
        ns: &Namespace,
        input: &Value,
        rec: &mut dyn RecordPlace,
    ) -> Result<(), DecodeErrors> {
        match input {
            Value::Map(map) => self.record_from_map(ns, map, rec),
            Value::Record(src) => {
                let map = self.flatten_record(ns, src)?;
                self.record_from_map(ns, &map, rec)
            }
            other => Err(node_error(
                ErrorKind::UnexpectedType,
                format!("expected a map, got '{}'", other.kind()),
            )),
        }
    }

    fn tag(&self, field: &Field) -> Tag {
        field
            .tag(&self.settings.tag_name)
            .map(Tag::parse)
            .unwrap_or_default()
    }

    fn record_from_map<'a>(
        &mut self,
        ns: &Namespace,
        map: &Map,
        root: &'a mut dyn RecordPlace,
    ) -> Result<(), DecodeErrors> {
        if let Some(k) = map.keys().find(|k| !matches!(k, Value::Str(_))) {
            return Err(node_error(
                ErrorKind::UnexpectedType,
                format!("needs a map with string keys, has '{}' keys", k.type_name()),
            ));
        }

        let mut errs = DecodeErrors::new();
        let mut targets: Vec<Target<'a>> = Vec::new();
        let mut remain: Option<Target<'a>> = None;

        // expand squashed records breadth first, so shallower fields come first
        let mut queue: VecDeque<&'a mut dyn RecordPlace> = VecDeque::new();
        queue.push_back(root);
        while let Some(rec) = queue.pop_front() {
            let fields = rec.fields();
            for (field, slot) in fields.iter().zip(rec.fields_mut()) {
                let tag = self.tag(field);
                if tag.skip {
                    continue;
                }

                let key = tag.name.unwrap_or(field.name);
                let kind = slot.shape().kind();
                let squash = tag.squash()
                    || (self.settings.squash && field.embedded && kind == Kind::Record);
                if squash {
                    match into_record(slot) {
                        Some(inner) => queue.push_back(inner),
                        None => errs.push(
                            DecodeError::new(
                                ErrorKind::Squash,
                                format!("unsupported type for squash: {}", kind),
                            )
                            .at(&Namespace::new().field(field.name, key)),
                        ),
                    }
                    continue;
                }

                let target = Target {
                    field: *field,
                    key,
                    slot,
                };
                if tag.remain() {
                    remain = Some(target);
                } else {
                    targets.push(target);
                }
            }
        }

        let mut unused: BTreeSet<&Value> = map.keys().collect();
        let mut unset: Vec<&'static str> = Vec::new();

        for Target { field, key, slot } in targets {
            let found = map.get_key_value(&Value::from(key)).or_else(|| {
                map.iter().find(|(k, _)| match k {
                    Value::Str(s) => (self.settings.match_name)(s.as_str(), key),
                    _ => false,
                })
            });

            match found {
                Some((k, v)) => {
                    unused.remove(k);
                    if let Err(e) = self.decode(&ns.field(field.name, key), v, slot) {
                        errs.extend(e);
                    }
                }
                None => unset.push(key),
            }
        }

        if let Some(Target { field, key, slot }) = remain {
            if !unused.is_empty() {
                let rest: Map = unused
                    .iter()
                    .filter_map(|k| map.get_key_value(*k))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                unused.clear();
                if let Err(e) = self.decode(&ns.field(field.name, key), &Value::Map(rest), slot) {
                    errs.extend(e);
                }
            }
        }

        if self.settings.error_unused && !unused.is_empty() {
            let mut keys: Vec<String> = unused.iter().map(|k| k.to_string()).collect();
            keys.sort();
            errs.extend(node_error(
                ErrorKind::UnusedKeys,
                format!("has invalid keys: {}", keys.join(", ")),
            ));
        }

        if self.settings.error_unset && !unset.is_empty() {
            let mut fields = unset.clone();
            fields.sort_unstable();
            errs.extend(node_error(
                ErrorKind::UnsetFields,
                format!("has unset fields: {}", fields.join(", ")),
            ));
        }

        if !errs.is_empty() {
            return Err(errs);
        }

        if let Some(md) = self.metadata.as_deref_mut() {
            let prefix = ns.key_path();
            let join = |key: &str| {
                if prefix.is_empty() {
                    key.to_string()
                } else {
                    format!("{}.{}", prefix, key)
                }
            };
            md.unused.extend(unused.iter().map(|k| join(&k.to_string())));
            md.unset.extend(unset.iter().map(|k| join(*k)));
        }

        Ok(())
    }

    /// Turn a record into a map keyed by field key.
    ///
    /// Nested records become nested maps, or merge into this one when squashed. Skipped fields,
    /// empty `omitempty` fields and, if configured, untagged fields are left out.
    pub(super) fn flatten_record(
        &self,
        ns: &Namespace,
        src: &RecordValue,
    ) -> Result<Map, DecodeErrors> {
        let mut out = Map::new();
        let mut errs = DecodeErrors::new();

        for fv in src.fields() {
            let field = &fv.field;
            let raw = field.tag(&self.settings.tag_name).unwrap_or("");
            if self.settings.ignore_untagged && raw.is_empty() {
                continue;
            }

            let tag = Tag::parse(raw);
            if tag.skip || (tag.omitempty() && fv.value.is_empty_value()) {
                continue;
            }

            let key = tag.name.unwrap_or(field.name);
            let squash = tag.squash()
                || (self.settings.squash && field.embedded && fv.value.record().is_some());

            match &fv.value {
                Value::Record(inner) => {
                    match self.flatten_record(&ns.key(&Value::from(key)), inner) {
                        Ok(nested) if squash => out.extend(nested),
                        Ok(nested) => {
                            out.insert(Value::from(key), Value::Map(nested));
                        }
                        Err(e) => errs.extend(e),
                    }
                }
                other if squash => {
                    let mut e = node_error(
                        ErrorKind::Squash,
                        format!("cannot squash non-struct type '{}'", other.type_name()),
                    );
                    e.locate(&ns.key(&Value::from(key)), other, || Value::Nil);
                    errs.extend(e);
                }
                other => {
                    out.insert(Value::from(key), other.clone());
                }
            }
        }

        errs.into_result().map(|_| out)
    }
}

/// The record behind a squashed field: the field itself, or the pointee of a non-null pointer.
fn into_record<'a>(slot: &'a mut dyn Reflect) -> Option<&'a mut dyn RecordPlace> {
    match slot.place() {
        Place::Record(rec) => Some(rec),
        Place::Ptr(ptr) => match ptr.pointee_mut()?.place() {
            Place::Record(rec) => Some(rec),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use std::collections::HashMap;

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Base {
        id: u32,
        kind: String,
    }

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Squashed {
        base: Base,
        name: String,
    }

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Embedded {
        base: Base,
        name: String,
    }

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Remainder {
        name: String,
        extra: HashMap<String, Value>,
    }

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Skips {
        keep: String,
        skipped: String,
        opt: u8,
    }

    #[derive(Clone, Default, Debug, PartialEq)]
    struct BadSquash {
        n: u8,
    }

    record!(Base { id, kind });
    record!(Squashed {
        base: restruct = ",squash",
        name,
    });
    record!(Embedded {
        #[embedded] base,
        name,
    });
    record!(Remainder {
        name,
        extra: restruct = ",remain",
    });
    record!(Skips {
        keep: restruct = "k",
        skipped: restruct = "-",
        opt: restruct = "o,omitempty",
    });
    record!(BadSquash {
        n: restruct = ",squash",
    });

    fn flat() -> Value {
        Value::new_map(vec![
            ("id", Value::from(7)),
            ("kind", Value::from("user")),
            ("name", Value::from("bob")),
        ])
    }

    #[test]
    fn squash_by_tag() {
        let out: Squashed = flat().decode().unwrap();
        assert_eq!(
            out,
            Squashed {
                base: Base {
                    id: 7,
                    kind: "user".into()
                },
                name: "bob".into(),
            }
        );
    }

    #[test]
    fn squash_embedded_by_config() {
        let mut out = Embedded::default();
        Decoder::new(DecoderConfig {
            squash: true,
            result: Some(&mut out),
            ..Default::default()
        })
        .unwrap()
        .decode(&flat())
        .unwrap();
        assert_eq!(out.base.id, 7);
        assert_eq!(out.name, "bob");

        // without the option the embedded record wants a nested map
        let mut out = Embedded::default();
        let mut md = Metadata::default();
        decode_metadata(&flat(), &mut out, &mut md).unwrap();
        assert_eq!(out.base, Base::default());
        assert_eq!(md.unset, vec!["base"]);
    }

    #[test]
    fn squash_non_record_fails() {
        let err = Value::new_map(vec![("n", 1)])
            .decode::<BadSquash>()
            .unwrap_err();
        let errs = err.decode_errors().unwrap();
        assert_eq!(errs.len(), 1);
        assert_eq!(
            errs.iter().next().map(|e| (e.kind(), e.to_string())),
            Some((ErrorKind::Squash, "n: unsupported type for squash: uint".to_string()))
        );
    }

    #[test]
    fn remain_collects_leftovers() {
        let input = Value::new_map(vec![
            ("name", Value::from("x")),
            ("a", Value::from(1)),
            ("b", Value::from(true)),
        ]);
        let mut out = Remainder::default();
        let mut md = Metadata::default();
        decode_metadata(&input, &mut out, &mut md).unwrap();

        assert_eq!(out.name, "x");
        assert_eq!(out.extra.len(), 2);
        assert_eq!(out.extra.get("a"), Some(&Value::from(1)));
        assert_eq!(out.extra.get("b"), Some(&Value::from(true)));
        assert!(md.unused.is_empty());
    }

    #[test]
    fn case_insensitive_fallback() {
        let input = Value::new_map(vec![("NAME", "loud"), ("Kind", "k")]);
        let out: Base = Value::new_map(vec![("ID", 1)]).decode().unwrap();
        assert_eq!(out.id, 1);

        let out: Remainder = input.decode().unwrap();
        assert_eq!(out.name, "loud");
        assert_eq!(out.extra.get("Kind"), Some(&Value::from("k")));
    }

    #[test]
    fn custom_match_name() {
        let mut out = Base::default();
        Decoder::new(DecoderConfig {
            match_name: Some(std::sync::Arc::new(|key: &str, field: &str| {
                key.trim_start_matches('_') == field
            })),
            result: Some(&mut out),
            ..Default::default()
        })
        .unwrap()
        .decode(&Value::new_map(vec![("_id", 3)]))
        .unwrap();
        assert_eq!(out.id, 3);
    }

    #[test]
    fn skip_tag_never_decodes() {
        let input = Value::new_map(vec![("k", "a"), ("skipped", "b"), ("-", "c")]);
        let mut out = Skips::default();
        let mut md = Metadata::default();
        decode_metadata(&input, &mut out, &mut md).unwrap();

        assert_eq!(out.keep, "a");
        assert_eq!(out.skipped, "");
        assert_eq!(md.unused, vec!["-", "skipped"]);
        assert_eq!(md.unset, vec!["o"]);
    }

    #[test]
    fn unused_and_unset_errors_are_sorted() {
        let input = Value::new_map(vec![("zeta", 1), ("alpha", 2), ("id", 3)]);
        let mut out = Base::default();
        let err = Decoder::new(DecoderConfig {
            error_unused: true,
            error_unset: true,
            result: Some(&mut out),
            ..Default::default()
        })
        .unwrap()
        .decode(&input)
        .unwrap_err();

        let kinds: Vec<ErrorKind> = err.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![ErrorKind::UnusedKeys, ErrorKind::UnsetFields]);
        assert_eq!(
            err.to_string(),
            "2 error(s) decoding:\n\n* has invalid keys: alpha, zeta\n* has unset fields: kind"
        );
    }

    #[test]
    fn record_to_record_through_map() {
        let src = Skips {
            keep: "k".into(),
            skipped: "s".into(),
            opt: 0,
        };
        let mut out: HashMap<String, Value> = HashMap::new();
        decode(&src.to_value(), &mut out).unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out.get("k"), Some(&Value::from("k")));
    }

    #[test]
    fn flatten_nests_and_squashes() {
        let src = Squashed {
            base: Base {
                id: 1,
                kind: "a".into(),
            },
            name: "n".into(),
        };
        let flat: HashMap<String, Value> = src.to_value().decode().unwrap();
        assert_eq!(flat.len(), 3);
        assert_eq!(flat.get("id"), Some(&Value::from(1u32)));

        let src = Embedded {
            base: Base {
                id: 1,
                kind: "a".into(),
            },
            name: "n".into(),
        };
        let nested: HashMap<String, Value> = src.to_value().decode().unwrap();
        assert_eq!(nested.len(), 2);
        assert_eq!(
            nested.get("base").and_then(|b| b.get("kind")),
            Some(&Value::from("a"))
        );
    }

    #[test]
    fn record_needs_string_keys() {
        let input = Value::new_map(vec![
            (Value::from(1), Value::from(2)),
            (Value::from("id"), Value::from(3)),
        ]);
        let err = input.decode::<Base>().unwrap_err();
        let errs = err.decode_errors().unwrap();

        assert_eq!(errs.len(), 1);
        assert_eq!(
            errs.iter().next().map(|e| (e.kind(), e.to_string())),
            Some((
                ErrorKind::UnexpectedType,
                "needs a map with string keys, has 'int' keys".to_string()
            ))
        );
    }
}
