use std::any::{type_name, Any, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A type-erased, shareable Rust value.
///
/// Natives carry values that have no dynamic representation (callables, handles, records kept
/// whole) through a [`Value`](crate::Value) tree. A native is only ever assigned to a destination
/// of the exact same type.
///
/// # Example
/// ```rust
/// # use restruct::*;
/// let native = Native::new(std::time::Duration::from_secs(3));
/// assert!(native.is::<std::time::Duration>());
/// assert_eq!(native.downcast_ref(), Some(&std::time::Duration::from_secs(3)));
/// assert_eq!(native.downcast_ref::<u8>(), None);
/// ```
#[derive(Clone)]
pub struct Native {
    inner: Arc<dyn Any + Send + Sync>,
    name: &'static str,
}

impl Native {
    /// Wrap a value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Native {
            inner: Arc::new(value),
            name: type_name::<T>(),
        }
    }

    /// The full type name of the wrapped value.
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// The type identity of the wrapped value.
    pub fn id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }
}

impl fmt::Debug for Native {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Native({})", self.name)
    }
}

/// Natives are equal only when they share the same allocation.
impl PartialEq for Native {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Native {}

impl PartialOrd for Native {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Native {
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            Ordering::Equal
        } else {
            self.name
                .cmp(other.name)
                .then_with(|| self.addr().cmp(&other.addr()))
        }
    }
}
