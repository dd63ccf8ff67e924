//! The per-node decode walk.
//!
//! One call to [`Walker::decode`] handles one node of the destination: the nil check, the hook,
//! the native fast path and then the rule for the destination's kind. Compound rules recurse
//! through `decode` again with a namespace extended by one segment, and collect their children's
//! errors instead of stopping at the first.
use super::{scalar, Metadata, Settings};
use crate::ds::Value;
use crate::error::{DecodeError, DecodeErrors, ErrorKind};
use crate::hook;
use crate::ns::Namespace;
use crate::reflect::{Place, PtrPlace, Reflect};

pub(crate) struct Walker<'s, 'm> {
    pub(super) settings: &'s Settings,
    pub(super) metadata: Option<&'m mut Metadata>,
}

impl<'s, 'm> Walker<'s, 'm> {
    pub(crate) fn new(settings: &'s Settings, metadata: Option<&'m mut Metadata>) -> Self {
        Walker { settings, metadata }
    }

    pub(crate) fn decode(
        &mut self,
        ns: &Namespace,
        input: &Value,
        out: &mut dyn Reflect,
    ) -> Result<(), DecodeErrors> {
        if input.is_nil() {
            if self.settings.zero_fields {
                out.zero();
                self.add_key(ns);
            }
            return Ok(());
        }

        let shape = out.shape();

        let hooked;
        let input = match &self.settings.hook {
            Some(h) => {
                hooked = match hook::exec(h, input.clone(), &shape) {
                    Ok(v) => v,
                    Err(e) => {
                        let mut errs = DecodeErrors::from_hook(e);
                        if !errs.is_empty() {
                            errs.locate(ns, input, || out.to_value());
                            return Err(errs);
                        }
                        // an empty aggregate is no failure at all
                        input.clone()
                    }
                };
                &hooked
            }
            None => input,
        };

        tracing::trace!(
            namespace = %ns,
            destination = %shape,
            source = input.type_name(),
            "decoding node"
        );

        if input.is_nil() {
            clear(out);
            self.add_key(ns);
            return Ok(());
        }

        if let Some(native) = input.native() {
            if out.assign(native) {
                self.add_key(ns);
                return Ok(());
            }
        }

        let mut add_key = true;
        let res: Result<(), DecodeErrors> = match out.place() {
            Place::Bool(b) => {
                scalar::decode_bool(self.settings, &shape, input, b).map_err(From::from)
            }
            Place::Int(slot) => {
                scalar::decode_int(self.settings, &shape, input, slot).map_err(From::from)
            }
            Place::Uint(slot) => {
                scalar::decode_uint(self.settings, &shape, input, slot).map_err(From::from)
            }
            Place::Float(slot) => {
                scalar::decode_float(self.settings, &shape, input, slot).map_err(From::from)
            }
            Place::Str(s) => {
                scalar::decode_string(self.settings, &shape, input, s).map_err(From::from)
            }
            Place::Dynamic(v) => {
                *v = input.clone();
                Ok(())
            }
            Place::Record(rec) => self.decode_record(ns, input, rec),
            Place::Map(map) => self.decode_map(ns, input, map),
            Place::Seq(seq) => self.decode_seq(ns, input, seq),
            Place::Array(arr) => self.decode_array(ns, input, arr),
            Place::Ptr(ptr) => {
                // the pointee records the key
                add_key = false;
                self.decode_ptr(ns, input, ptr)
            }
            Place::Opaque => Err(scalar::unexpected(&shape, input).into()),
            Place::Unit => Err(DecodeError::new(
                ErrorKind::UnsupportedType,
                format!("unsupported type: '{}'", shape.kind()),
            )
            .into()),
        };

        match res {
            Ok(()) => {
                if add_key {
                    self.add_key(ns);
                }
                Ok(())
            }
            Err(mut errs) => {
                errs.locate(ns, input, || out.to_value());
                Err(errs)
            }
        }
    }

    fn decode_ptr(
        &mut self,
        ns: &Namespace,
        input: &Value,
        ptr: &mut dyn PtrPlace,
    ) -> Result<(), DecodeErrors> {
        let fresh = self.settings.zero_fields;
        ptr.fill(fresh, &mut |pointee| self.decode(ns, input, pointee))
    }

    pub(super) fn add_key(&mut self, ns: &Namespace) {
        if ns.is_empty() {
            return;
        }
        if let Some(md) = self.metadata.as_deref_mut() {
            md.keys.push(ns.key_path());
        }
    }

    /// Run `f` with metadata collection switched off.
    pub(super) fn untracked<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut Self) -> T,
    {
        let md = self.metadata.take();
        let out = f(self);
        self.metadata = md;
        out
    }
}

/// A hook produced nil: pointers are reset, dynamic slots take the nil, anything else is left as
/// is.
fn clear(out: &mut dyn Reflect) {
    match out.place() {
        Place::Ptr(ptr) => ptr.set_null(),
        Place::Dynamic(v) => *v = Value::Nil,
        _ => (),
    }
}

/// An error about the node being decoded, located once it leaves the node.
pub(super) fn node_error<M: Into<String>>(kind: ErrorKind, message: M) -> DecodeErrors {
    DecodeError::new(kind, message).into()
}
