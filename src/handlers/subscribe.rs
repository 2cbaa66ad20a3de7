//! # Event subscriber trait.
//!
//! [`Subscribe`] is the extension point a listener type implements to take
//! part in dispatch. Discovery is declarative and resolved at registration
//! time; there is no runtime reflection:
//!
//! - [`Subscribe::handlers`] is a pure function of the type, naming every
//!   event key the type handles together with its execution affinity and
//!   optional fire-once flag;
//! - [`Subscribe::deliver`] routes one event to the matching handler body.
//!
//! ## Rules
//! - `deliver` receives the *normalized* key (trimmed, lowercased); match on
//!   lowercase literals.
//! - `deliver` takes `&self`; handlers mutate through interior mutability.
//! - Report failures by returning [`HandlerError`]; failures and panics are
//!   caught at the subscription boundary and never abort the dispatch loop.
//! - Declaring a key and not routing it in `deliver` is a target bug;
//!   return [`HandlerError::Unhandled`] from the fallthrough arm so it is
//!   reported instead of silently swallowed.

use std::any::type_name;

use crate::error::HandlerError;
use crate::events::Event;
use crate::handlers::HandlerSet;

/// A listener type that can register with a
/// [`Dispatcher`](crate::Dispatcher).
///
/// Targets are owned externally as `Arc<T>`; the dispatcher keeps only weak
/// references and silently stops delivering once the last owner drops the
/// target.
///
/// ## Example
/// ```
/// use parking_lot::Mutex;
/// use eventcast::{Event, Handler, HandlerError, HandlerSet, Subscribe};
///
/// struct Counter {
///     hits: Mutex<u32>,
/// }
///
/// impl Subscribe for Counter {
///     fn handlers() -> HandlerSet {
///         HandlerSet::for_type::<Self>().with(Handler::on("counter.hit"))
///     }
///
///     fn deliver(&self, event: &Event) -> Result<(), HandlerError> {
///         match event.key.as_str() {
///             "counter.hit" => {
///                 *self.hits.lock() += *event.args.get::<u32>(0)?;
///                 Ok(())
///             }
///             _ => Err(HandlerError::Unhandled {
///                 key: event.key.clone(),
///             }),
///         }
///     }
///
///     fn name(&self) -> &'static str {
///         "counter"
///     }
/// }
/// ```
pub trait Subscribe: Send + Sync + 'static {
    /// Declarative catalog of the event keys this type handles.
    ///
    /// A pure function of the type. The catalog is resolved and validated
    /// once, at registration.
    fn handlers() -> HandlerSet
    where
        Self: Sized;

    /// Routes one event to the matching handler body.
    ///
    /// Called only for keys present in the resolved catalog, on the posting
    /// thread or on the main context for keys declared with
    /// [`Handler::on_main`](crate::Handler::on_main).
    fn deliver(&self, event: &Event) -> Result<(), HandlerError>;

    /// Short name used in traces and failure reports.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose -
    /// override it when possible.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}
