//! Maps, sequences and arrays.
use super::engine::{node_error, Walker};
use crate::ds::{Map, Value};
use crate::error::{DecodeErrors, ErrorKind};
use crate::ns::Namespace;
use crate::reflect::{MapPlace, SeqPlace};
use std::borrow::Cow;

impl<'s, 'm> Walker<'s, 'm> {
    pub(super) fn decode_map(
        &mut self,
        ns: &Namespace,
        input: &Value,
        map: &mut dyn MapPlace,
    ) -> Result<(), DecodeErrors> {
        if self.settings.zero_fields {
            map.clear();
        }

        match input {
            Value::Seq(items) if self.settings.weak => {
                // each element merges into the same map
                let mut errs = DecodeErrors::new();
                for item in items {
                    if let Err(e) = self.merge_map(ns, item, map) {
                        errs.extend(e);
                    }
                }
                errs.into_result()
            }
            Value::Bytes(b) if self.settings.weak && b.is_empty() => Ok(()),
            other => self.merge_map(ns, other, map),
        }
    }

    fn merge_map(
        &mut self,
        ns: &Namespace,
        input: &Value,
        map: &mut dyn MapPlace,
    ) -> Result<(), DecodeErrors> {
        match input {
            Value::Map(src) => self.map_from_map(ns, src, map),
            Value::Record(rec) => {
                let flat = self.flatten_record(ns, rec)?;
                self.map_from_map(ns, &flat, map)
            }
            other => Err(node_error(
                ErrorKind::UnexpectedType,
                format!("expected a map, got '{}'", other.kind()),
            )),
        }
    }

    fn map_from_map(
        &mut self,
        ns: &Namespace,
        src: &Map,
        map: &mut dyn MapPlace,
    ) -> Result<(), DecodeErrors> {
        let mut errs = DecodeErrors::new();

        for (k, v) in src {
            let entry = ns.key(k);
            let res = map.insert_with(&mut |key, value| {
                self.untracked(|w| w.decode(&entry, k, key))?;
                self.decode(&entry, v, value)
            });
            if let Err(e) = res {
                errs.extend(e);
            }
        }

        errs.into_result()
    }

    /// The source elements for a sequence or array, lifting non-sequences under weak typing.
    fn elements<'v>(&self, input: &'v Value, byte_elems: bool) -> Option<Cow<'v, [Value]>> {
        let weak = self.settings.weak;
        match input {
            Value::Seq(items) => Some(Cow::Borrowed(items.as_slice())),
            Value::Bytes(b) => Some(Cow::Owned(b.iter().map(|x| Value::from(*x)).collect())),
            Value::Map(m) if weak && m.is_empty() => Some(Cow::Owned(Vec::new())),
            Value::Str(s) if weak && byte_elems => {
                Some(Cow::Owned(s.bytes().map(Value::from).collect()))
            }
            other if weak => Some(Cow::Owned(vec![other.clone()])),
            _ => None,
        }
    }

    pub(super) fn decode_seq(
        &mut self,
        ns: &Namespace,
        input: &Value,
        seq: &mut dyn SeqPlace,
    ) -> Result<(), DecodeErrors> {
        let byte_elems = seq.elem_shape().is::<u8>();
        let items = self.elements(input, byte_elems).ok_or_else(|| {
            node_error(
                ErrorKind::UnexpectedType,
                format!("source data must be an array or slice, got {}", input.kind()),
            )
        })?;

        if self.settings.zero_fields {
            seq.clear();
        }
        seq.resize(items.len());
        self.fill_elements(ns, &items, seq)
    }

    pub(super) fn decode_array(
        &mut self,
        ns: &Namespace,
        input: &Value,
        arr: &mut dyn SeqPlace,
    ) -> Result<(), DecodeErrors> {
        let items = match input {
            Value::Map(m) if self.settings.weak => {
                if m.is_empty() {
                    arr.clear();
                    return Ok(());
                }
                None
            }
            _ => self.elements(input, false),
        }
        .ok_or_else(|| {
            node_error(
                ErrorKind::UnexpectedType,
                format!("source data must be an array or slice, got {}", input.kind()),
            )
        })?;

        if items.len() > arr.len() {
            return Err(node_error(
                ErrorKind::Length,
                format!(
                    "expected source data to have length less or equal to {}, got {}",
                    arr.len(),
                    items.len()
                ),
            ));
        }

        if self.settings.zero_fields {
            arr.clear();
        }
        self.fill_elements(ns, &items, arr)
    }

    fn fill_elements(
        &mut self,
        ns: &Namespace,
        items: &[Value],
        seq: &mut dyn SeqPlace,
    ) -> Result<(), DecodeErrors> {
        let mut errs = DecodeErrors::new();
        for (i, item) in items.iter().enumerate() {
            if let Some(slot) = seq.elem_mut(i) {
                if let Err(e) = self.decode(&ns.index(i), item, slot) {
                    errs.extend(e);
                }
            }
        }
        errs.into_result()
    }
}
