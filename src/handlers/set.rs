use std::any::type_name;

use crate::events::EventKey;

/// Execution affinity of a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Affinity {
    /// Run synchronously on the posting thread.
    Caller,
    /// Defer onto the designated serial execution context.
    Main,
}

/// One declared handler: event key, execution affinity, optional fire-once
/// flag. Immutable once built.
#[derive(Clone, Debug)]
pub struct Handler {
    pub(crate) key: EventKey,
    pub(crate) affinity: Affinity,
    pub(crate) once: bool,
}

impl Handler {
    /// Declares a caller-thread handler for `key`.
    pub fn on(key: impl Into<EventKey>) -> Self {
        Self {
            key: key.into(),
            affinity: Affinity::Caller,
            once: false,
        }
    }

    /// Declares a main-thread handler for `key`: deliveries are deferred
    /// onto the dispatcher's [`Marshal`](crate::Marshal) context.
    pub fn on_main(key: impl Into<EventKey>) -> Self {
        Self {
            key: key.into(),
            affinity: Affinity::Main,
            once: false,
        }
    }

    /// Marks the handler fire-once: it is consumed the first time it is
    /// scheduled for dispatch and never fires again.
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }
}

/// One declaration group: the handlers declared by a single type, tagged with
/// that type's path.
#[derive(Clone, Debug)]
pub(crate) struct HandlerGroup {
    pub(crate) origin: &'static str,
    pub(crate) handlers: Vec<Handler>,
}

/// Declarative handler catalog of a target type.
///
/// The first group holds the type's own declarations; groups appended with
/// [`HandlerSet::base`] follow in order, standing in for supertype scanning
/// in a language without inheritance. Shallow registration reads
/// only the own group; [`register_deep`](crate::Dispatcher::register_deep)
/// walks base groups until it reaches one whose declaring type lives in a
/// foreign namespace (see
/// [`Config::foreign_namespaces`](crate::Config::foreign_namespaces)).
///
/// ## Example
/// ```
/// use eventcast::{Handler, HandlerSet};
///
/// struct Widget;
///
/// let set = HandlerSet::for_type::<Widget>()
///     .with(Handler::on("widget.refresh"))
///     .with(Handler::on_main("widget.render").once());
/// # let _ = set;
/// ```
#[derive(Clone, Debug)]
pub struct HandlerSet {
    pub(crate) groups: Vec<HandlerGroup>,
}

impl HandlerSet {
    /// Starts the catalog for `T` with an empty own-declaration group.
    pub fn for_type<T: ?Sized>() -> Self {
        Self {
            groups: vec![HandlerGroup {
                origin: type_name::<T>(),
                handlers: Vec::new(),
            }],
        }
    }

    /// Adds one handler to the own-declaration group.
    #[must_use]
    pub fn with(mut self, handler: Handler) -> Self {
        self.groups[0].handlers.push(handler);
        self
    }

    /// Chains the declarations of a base (embedded or delegated-to) type.
    ///
    /// Base groups keep their declaring origin and are consulted only by
    /// deep registration. On key collision the later-scanned declaration
    /// wins, so a base handler overrides an own handler for the same key.
    #[must_use]
    pub fn base(mut self, base: HandlerSet) -> Self {
        self.groups.extend(base.groups);
        self
    }
}
