//! # Main-thread marshalling.
//!
//! [`Marshal`] abstracts the designated serial execution context that
//! handlers declared with [`Handler::on_main`](crate::Handler::on_main) run
//! on. Submission is fire-and-forget: the poster never awaits a deferred
//! delivery, and a submit after the context has shut down is dropped
//! silently.
//!
//! ```text
//! post() ──► Subscription::invoke ──┬─ Affinity::Caller ─► deliver() inline
//!                                   └─ Affinity::Main ───► Marshal::submit
//!                                                              │
//!                                               [queue] ─► serial context
//!                                                              └─► deliver()
//! ```
//!
//! Provided contexts:
//! - [`ThreadMarshal`] — a dedicated OS thread draining a queue; the analog
//!   of a UI main loop.
//! - [`TokioMarshal`] — a serial consumer task on an existing tokio runtime.
//! - [`InlineMarshal`] — degenerate context running jobs on the submitting
//!   thread; the default, and the stand-in for tests.

mod inline;
mod runtime;
mod thread;

pub use inline::InlineMarshal;
pub use runtime::TokioMarshal;
pub use thread::ThreadMarshal;

/// A deferred handler invocation.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// The designated serial execution context for main-affine handlers.
///
/// Implementations run submitted jobs one at a time, preserving submission
/// order relative to other jobs submitted through the same marshaller. No
/// ordering is guaranteed relative to work already running on the context.
/// `submit` returns no result and propagates no errors.
pub trait Marshal: Send + Sync + 'static {
    /// Schedules `job` on the serial context. Never blocks.
    fn submit(&self, job: Job);
}
