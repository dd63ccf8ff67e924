//! Errors raised while configuring a decoder or decoding a value.
//!
//! Decoding collects every field error it meets rather than stopping at the first one. Each
//! failure is a [`DecodeError`] that knows _where_ it happened (its [`Namespace`]) and _what_
//! happened (its [`ErrorKind`]). A decode pass returns them together as [`DecodeErrors`].
use crate::ds::Value;
use crate::ns::Namespace;
use std::borrow::Cow;
use std::error;
use std::fmt;
use std::sync::Arc;

/// A boxed error, as returned by decode hooks.
pub type BoxError = Box<dyn error::Error + Send + Sync>;

/// The category of a [`DecodeError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The destination type has no decode rule.
    UnsupportedType,
    /// The source value cannot be converted into the destination type.
    UnexpectedType,
    /// A weakly typed string could not be parsed.
    Parse,
    /// A number does not fit the destination, or is negative for an unsigned destination.
    Overflow,
    /// The source sequence is longer than the destination array.
    Length,
    /// A field marked for squashing is not a record.
    Squash,
    /// Source map keys matched no field.
    UnusedKeys,
    /// Record fields had no matching source key.
    UnsetFields,
    /// A decode hook failed.
    Hook,
    /// Any other failure.
    Custom,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ErrorKind::UnsupportedType => "unsupported type",
            ErrorKind::UnexpectedType => "unexpected type",
            ErrorKind::Parse => "parse",
            ErrorKind::Overflow => "overflow",
            ErrorKind::Length => "length",
            ErrorKind::Squash => "squash",
            ErrorKind::UnusedKeys => "unused keys",
            ErrorKind::UnsetFields => "unset fields",
            ErrorKind::Hook => "hook",
            ErrorKind::Custom => "custom",
        };
        f.write_str(s)
    }
}

// ****************************** SINGLE ERROR ********************************

/// A single decoding failure at one location.
///
/// Renders as `<namespace>: <header><message>`, or without the namespace prefix at the root.
/// The source value and a snapshot of the destination at the time of failure are kept for
/// inspection.
///
/// # Example
/// ```rust
/// # use restruct::*;
/// let err = DecodeError::new(ErrorKind::Custom, "went wrong")
///     .with_header("while testing: ")
///     .at(&Namespace::new().field("a", "a").index(1));
///
/// assert_eq!(err.to_string(), "a[1]: while testing: went wrong");
/// assert_eq!(err.kind(), ErrorKind::Custom);
/// ```
#[derive(Clone, Debug)]
pub struct DecodeError {
    ns: Namespace,
    kind: ErrorKind,
    header: Cow<'static, str>,
    message: String,
    cause: Option<Arc<dyn error::Error + Send + Sync>>,
    src: Option<Value>,
    dst: Option<Value>,
    located: bool,
}

impl DecodeError {
    /// A new error at the root namespace.
    pub fn new<M: Into<String>>(kind: ErrorKind, message: M) -> Self {
        DecodeError {
            ns: Namespace::new(),
            kind,
            header: Cow::Borrowed(""),
            message: message.into(),
            cause: None,
            src: None,
            dst: None,
            located: false,
        }
    }

    /// A new error whose message is taken from an underlying cause.
    pub fn wrap<E: Into<BoxError>>(kind: ErrorKind, cause: E) -> Self {
        let cause: Arc<dyn error::Error + Send + Sync> = Arc::from(cause.into());
        DecodeError {
            message: cause.to_string(),
            cause: Some(cause),
            ..DecodeError::new(kind, "")
        }
    }

    /// Set the text placed between the namespace and the message.
    pub fn with_header<H: Into<Cow<'static, str>>>(mut self, header: H) -> Self {
        self.header = header.into();
        self
    }

    /// Place the error at `ns`.
    pub fn at(mut self, ns: &Namespace) -> Self {
        self.ns = ns.clone();
        self
    }

    pub fn with_source_value(mut self, value: Value) -> Self {
        self.src = Some(value);
        self
    }

    pub fn with_destination_value(mut self, value: Value) -> Self {
        self.dst = Some(value);
        self
    }

    pub fn namespace(&self) -> &Namespace {
        &self.ns
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The source value that failed to decode.
    pub fn source_value(&self) -> Option<&Value> {
        self.src.as_ref()
    }

    /// The destination as it was when decoding failed.
    pub fn destination_value(&self) -> Option<&Value> {
        self.dst.as_ref()
    }

    /// Put `prefix` in front of the error's namespace.
    pub fn prepend_namespace(&mut self, prefix: &Namespace) {
        self.ns.prepend(prefix);
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.ns.is_empty() {
            write!(f, "{}: ", self.ns)?;
        }
        write!(f, "{}{}", self.header, self.message)
    }
}

impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn error::Error + 'static))
    }
}

// ****************************** AGGREGATE ***********************************

/// Every failure of one decode pass.
///
/// Appending an aggregate to another splices its members in, so aggregates never nest. The
/// rendering lists members as bullets sorted lexicographically, making it stable regardless of
/// map iteration order.
///
/// # Example
/// ```rust
/// # use restruct::*;
/// let mut errs = DecodeErrors::new();
/// errs.push(DecodeError::new(ErrorKind::Custom, "second"));
/// errs.push(DecodeError::new(ErrorKind::Custom, "first"));
///
/// assert_eq!(errs.to_string(), "2 error(s) decoding:\n\n* first\n* second");
/// ```
#[derive(Clone, Debug, Default)]
pub struct DecodeErrors {
    errors: Vec<DecodeError>,
}

impl DecodeErrors {
    pub fn new() -> Self {
        DecodeErrors::default()
    }

    pub fn push(&mut self, err: DecodeError) {
        self.errors.push(err);
    }

    /// Splice every member of `other` in.
    pub fn extend(&mut self, other: DecodeErrors) {
        self.errors.extend(other.errors);
    }

    /// Append an arbitrary error. Aggregates are spliced, single decode errors pushed, and
    /// anything else wrapped as a [`ErrorKind::Custom`] error at the root.
    pub fn append(&mut self, err: BoxError) {
        match err.downcast::<DecodeErrors>() {
            Ok(errs) => self.extend(*errs),
            Err(err) => match err.downcast::<DecodeError>() {
                Ok(e) => self.push(*e),
                Err(err) => self.push(DecodeError::wrap(ErrorKind::Custom, err)),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DecodeError> {
        self.errors.iter()
    }

    /// Put `prefix` in front of every member's namespace.
    pub fn prepend_namespace(&mut self, prefix: &Namespace) {
        for e in &mut self.errors {
            e.prepend_namespace(prefix);
        }
    }

    /// `Ok` if there are no members.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Attach the node location to every member raised at that node: the namespace is put in
    /// front, and the source value and a snapshot of the destination are filled in when missing.
    /// Members located by a deeper node are left alone.
    pub(crate) fn locate<F: FnOnce() -> Value>(&mut self, ns: &Namespace, src: &Value, dst: F) {
        if self.errors.iter().all(|e| e.located) {
            return;
        }
        let dst = dst();
        for e in self.errors.iter_mut().filter(|e| !e.located) {
            e.located = true;
            e.ns.prepend(ns);
            e.src.get_or_insert_with(|| src.clone());
            e.dst.get_or_insert_with(|| dst.clone());
        }
    }

    /// Convert a hook failure into decode errors. Aggregates and decode errors are taken as is,
    /// anything else is wrapped as an [`ErrorKind::Hook`] error.
    ///
    /// Namespaces coming out of a hook are relative to the hooked node, even when the hook ran a
    /// decoder of its own, so every member is left for the node to locate.
    pub(crate) fn from_hook(err: BoxError) -> Self {
        let mut errs = match err.downcast::<DecodeErrors>() {
            Ok(errs) => *errs,
            Err(err) => match err.downcast::<DecodeError>() {
                Ok(e) => DecodeErrors::from(*e),
                Err(err) => DecodeError::wrap(ErrorKind::Hook, err)
                    .with_header("error decoding: ")
                    .into(),
            },
        };
        for e in &mut errs.errors {
            e.located = false;
        }
        errs
    }
}

impl From<DecodeError> for DecodeErrors {
    fn from(err: DecodeError) -> Self {
        DecodeErrors { errors: vec![err] }
    }
}

impl IntoIterator for DecodeErrors {
    type Item = DecodeError;
    type IntoIter = std::vec::IntoIter<DecodeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a DecodeErrors {
    type Item = &'a DecodeError;
    type IntoIter = std::slice::Iter<'a, DecodeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for DecodeErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut points: Vec<String> = self.errors.iter().map(|e| format!("* {}", e)).collect();
        points.sort();
        write!(
            f,
            "{} error(s) decoding:\n\n{}",
            self.errors.len(),
            points.join("\n")
        )
    }
}

impl error::Error for DecodeErrors {}

// ****************************** CONFIG AND TOP LEVEL ************************

/// A decoder configuration is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No destination was supplied.
    #[error("result must be a pointer")]
    MissingResult,
    /// Wraparound of negative numbers only applies to weakly typed input.
    #[error("wrap_negative_unsigned requires weakly_typed_input")]
    WrapRequiresWeak,
}

/// The error returned by the convenience decode functions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    /// See [`ConfigError`].
    Config(#[from] ConfigError),
    #[error(transparent)]
    /// See [`DecodeErrors`].
    Decode(#[from] DecodeErrors),
}

impl Error {
    /// The decode errors, if decoding started at all.
    pub fn decode_errors(&self) -> Option<&DecodeErrors> {
        match self {
            Error::Decode(errs) => Some(errs),
            Error::Config(_) => None,
        }
    }
}

/// A weakly typed string could not be read as the destination type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parsing {input:?}: {reason}")]
pub struct ParseError {
    pub input: String,
    pub reason: ParseReason,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum ParseReason {
    #[error("invalid syntax")]
    Syntax,
    #[error("value out of range")]
    Range,
}

impl ParseError {
    pub(crate) fn syntax(input: &str) -> Self {
        ParseError {
            input: input.to_string(),
            reason: ParseReason::Syntax,
        }
    }

    pub(crate) fn range(input: &str) -> Self {
        ParseError {
            input: input.to_string(),
            reason: ParseReason::Range,
        }
    }
}
