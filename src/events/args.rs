use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use crate::error::HandlerError;

/// Ordered, shared argument list attached to an [`Event`](crate::Event).
///
/// Arguments are type-erased at post time; handlers read them back with
/// [`EventArgs::get`], which reports a missing or wrongly-typed position as a
/// [`HandlerError`] so a mismatched handler surfaces the failure instead of
/// panicking.
///
/// Cloning is cheap (the values are shared).
#[derive(Clone, Default)]
pub struct EventArgs {
    values: Vec<Arc<dyn Any + Send + Sync>>,
}

impl EventArgs {
    /// Empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one argument.
    pub fn push<T: Any + Send + Sync>(&mut self, value: T) {
        self.values.push(Arc::new(value));
    }

    /// Typed read of the argument at `index`.
    ///
    /// # Example
    /// ```
    /// use eventcast::EventArgs;
    ///
    /// let mut args = EventArgs::new();
    /// args.push(42u32);
    /// assert_eq!(*args.get::<u32>(0).unwrap(), 42);
    /// assert!(args.get::<String>(0).is_err());
    /// assert!(args.get::<u32>(1).is_err());
    /// ```
    pub fn get<T: Any>(&self, index: usize) -> Result<&T, HandlerError> {
        let slot = self
            .values
            .get(index)
            .ok_or(HandlerError::MissingArg { index })?;
        slot.downcast_ref::<T>().ok_or(HandlerError::ArgType {
            index,
            expected: type_name::<T>(),
        })
    }

    /// Number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no arguments were attached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for EventArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventArgs")
            .field("len", &self.values.len())
            .finish()
    }
}
