//! Decode hooks: user transformations run on a source value before it is decoded.
//!
//! A hook receives the shape of the source value, the shape of the destination and the value
//! itself, and returns the value to decode in its place. Hooks run once for every node of the
//! decode tree, after the nil check and before the kind-specific rules, so a hook that does not
//! recognise its input should hand it back unchanged.
//!
//! ```rust
//! use restruct::*;
//! use restruct::hook::{self, DecodeHook};
//!
//! // "a,b,c" into a sequence destination becomes ["a", "b", "c"]
//! let split = hook::string_to_seq(",");
//!
//! // everything string gets upper-cased first
//! let upper = DecodeHook::new(|from, _to, data| match data {
//!     Value::Str(s) if from.kind() == Kind::String => Ok(Value::Str(s.to_uppercase())),
//!     other => Ok(other),
//! });
//!
//! let mut out: Vec<String> = Vec::new();
//! let mut dec = Decoder::new(DecoderConfig {
//!     hook: Some(hook::compose(vec![upper, split])),
//!     result: Some(&mut out),
//!     ..Default::default()
//! }).unwrap();
//!
//! dec.decode(&Value::from("a,b,c")).unwrap();
//! drop(dec);
//! assert_eq!(out, vec!["A", "B", "C"]);
//! ```
use crate::ds::{Native, Value};
use crate::error::BoxError;
use crate::shape::{Kind, Shape};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

/// The signature of a decode hook.
pub type HookFn = dyn Fn(&Shape, &Shape, Value) -> Result<Value, BoxError> + Send + Sync;

/// A shareable decode hook.
#[derive(Clone)]
pub struct DecodeHook(Arc<HookFn>);

impl DecodeHook {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Shape, &Shape, Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        DecodeHook(Arc::new(f))
    }

    /// Run the hook. `from` is the shape of `data`, `to` the shape of the destination.
    pub fn call(&self, from: &Shape, to: &Shape, data: Value) -> Result<Value, BoxError> {
        (self.0)(from, to, data)
    }
}

impl fmt::Debug for DecodeHook {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("DecodeHook")
    }
}

/// Run `hook` against `data` for a destination of shape `to`, deriving the source shape from the
/// value.
pub fn exec(hook: &DecodeHook, data: Value, to: &Shape) -> Result<Value, BoxError> {
    let from = data.shape();
    hook.call(&from, to, data)
}

/// A hook that returns its input unchanged.
pub fn noop() -> DecodeHook {
    DecodeHook::new(|_, _, data| Ok(data))
}

/// Chain hooks: each receives the previous one's output, with the _from_ shape updated to the
/// shape of that output. The first error stops the chain.
///
/// An empty chain behaves like [`noop`].
pub fn compose<I>(hooks: I) -> DecodeHook
where
    I: IntoIterator<Item = DecodeHook>,
{
    let hooks: Vec<DecodeHook> = hooks.into_iter().collect();
    DecodeHook::new(move |from, to, data| {
        let mut from = *from;
        let mut data = data;
        for hook in &hooks {
            data = hook.call(&from, to, data)?;
            from = data.shape();
        }
        Ok(data)
    })
}

/// Try hooks in order against the original input and return the first success.
///
/// If every hook fails the error message is each failure's message followed by a newline, in
/// order.
///
/// # Example
/// ```rust
/// # use restruct::*;
/// use restruct::hook::{self, DecodeHook};
///
/// let fail = |msg: &'static str| DecodeHook::new(move |_, _, _| Err(msg.into()));
/// let h = hook::or_compose(vec![fail("f1 error"), fail("f2 error")]);
///
/// let err = hook::exec(&h, Value::Nil, &Value::Nil.shape()).unwrap_err();
/// assert_eq!(err.to_string(), "f1 error\nf2 error\n");
/// ```
pub fn or_compose<I>(hooks: I) -> DecodeHook
where
    I: IntoIterator<Item = DecodeHook>,
{
    let hooks: Vec<DecodeHook> = hooks.into_iter().collect();
    DecodeHook::new(move |from, to, data| {
        let mut failures = String::new();
        for hook in &hooks {
            match hook.call(from, to, data.clone()) {
                Ok(v) => return Ok(v),
                Err(e) => {
                    failures.push_str(&e.to_string());
                    failures.push('\n');
                }
            }
        }
        Err(failures.into())
    })
}

/// Split a string on `sep` when the destination is a sequence. An empty string becomes an empty
/// sequence.
pub fn string_to_seq(sep: &str) -> DecodeHook {
    let sep = sep.to_string();
    DecodeHook::new(move |from, to, data| match data {
        Value::Str(s) if from.kind() == Kind::String && to.kind() == Kind::Seq => {
            if s.is_empty() {
                Ok(Value::Seq(Vec::new()))
            } else {
                Ok(Value::new_seq(s.split(sep.as_str())))
            }
        }
        data => Ok(data),
    })
}

/// Parse a string into an [`IpAddr`] when the destination is an `Opaque<IpAddr>`.
pub fn string_to_ip_addr() -> DecodeHook {
    parse_into::<IpAddr>()
}

/// Parse a string into a [`SocketAddr`] when the destination is an `Opaque<SocketAddr>`.
pub fn string_to_socket_addr() -> DecodeHook {
    parse_into::<SocketAddr>()
}

fn parse_into<T>() -> DecodeHook
where
    T: std::str::FromStr + Send + Sync + 'static,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    DecodeHook::new(|from, to, data| match data {
        Value::Str(s) if from.kind() == Kind::String && to.is::<T>() => {
            let parsed: T = s.parse()?;
            Ok(Value::Native(Native::new(parsed)))
        }
        data => Ok(data),
    })
}
