//! # eventcast
//!
//! **Eventcast** is an in-process publish/subscribe dispatcher for Rust.
//!
//! Callers post named events with arbitrary arguments; registered listener
//! objects receive callbacks for the event keys they declare handlers for.
//! The crate is designed as a wiring layer between otherwise decoupled
//! subsystems of one process.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!  │  impl        │    │  impl        │    │  impl        │
//!  │  Subscribe   │    │  Subscribe   │    │  Subscribe   │
//!  │ (listener 1) │    │ (listener 2) │    │ (listener N) │
//!  └──────┬───────┘    └──────┬───────┘    └──────┬───────┘
//!         │ register (weak)   │                   │
//!         ▼                   ▼                   ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  Dispatcher                                               │
//! │  - Registry (weak target table + per-target ignore sets)  │
//! │  - HandlerCatalog scan (declarative, validated)           │
//! │  - per-thread pending queue + drain guard                 │
//! └───────┬──────────────────────────────────┬────────────────┘
//!         │ post(Event)                      │ Handler::on_main
//!         ▼                                  ▼
//!   caller-thread delivery          Marshal (serial context)
//!   (synchronous, FIFO)             ThreadMarshal / TokioMarshal
//! ```
//!
//! ### Dispatch flow
//! ```text
//! post(Event)
//!   ├─► Registry::resolve(key)      skip ignored keys, skip dead targets
//!   ├─► enqueue on this thread's FIFO (one entry per matching target)
//!   └─► drain, unless a drain is already running on this thread
//!         │
//!         ├─ Affinity::Caller ──► Subscribe::deliver  (on this thread)
//!         └─ Affinity::Main ────► Marshal::submit     (fire-and-forget)
//!
//! a post() from inside a handler enqueues onto the running drain and
//! returns: deliveries are breadth-first, never nested.
//! ```
//!
//! ## Features
//! | Area            | Description                                             | Key types / traits                  |
//! |-----------------|---------------------------------------------------------|-------------------------------------|
//! | **Listeners**   | Declarative handler catalogs, no runtime reflection.    | [`Subscribe`], [`HandlerSet`]       |
//! | **Dispatch**    | FIFO per post, reentrancy-safe, weakly-owned targets.   | [`Dispatcher`], [`Event`]           |
//! | **Affinity**    | Per-handler caller-thread vs main-context execution.    | [`Handler`], [`Marshal`]            |
//! | **Suppression** | Per-target, additive-only event ignore sets.            | [`Dispatcher::unregister_event`]    |
//! | **Errors**      | Typed caller errors; isolated handler failures.         | [`DispatchError`], [`HandlerError`] |
//!
//! ## Lifetime rules
//! Targets are owned externally as `Arc<T>`; the dispatcher holds only weak
//! references. Dropping the last external reference silently ends delivery:
//! registration never extends a listener's lifetime, and a delivery racing a
//! drop is a no-op, not an error.
//!
//! ## Example
//! ```
//! use std::sync::Arc;
//!
//! use eventcast::{Dispatcher, Event, Handler, HandlerError, HandlerSet, Subscribe};
//!
//! struct Greeter;
//!
//! impl Subscribe for Greeter {
//!     fn handlers() -> HandlerSet {
//!         HandlerSet::for_type::<Self>().with(Handler::on("app.greet"))
//!     }
//!
//!     fn deliver(&self, event: &Event) -> Result<(), HandlerError> {
//!         match event.key.as_str() {
//!             "app.greet" => {
//!                 let who = event.args.get::<String>(0)?;
//!                 println!("hello, {who}");
//!                 Ok(())
//!             }
//!             _ => Err(HandlerError::Unhandled {
//!                 key: event.key.clone(),
//!             }),
//!         }
//!     }
//! }
//!
//! let bus = Dispatcher::new();
//! let greeter = Arc::new(Greeter);
//! bus.register(&greeter)?;
//! bus.post(Event::new("app.greet").with_arg(String::from("world")))?;
//! # Ok::<(), eventcast::DispatchError>(())
//! ```

mod config;
mod core;
mod error;
mod events;
mod handlers;
mod marshal;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{Dispatcher, DispatcherBuilder};
pub use error::{DispatchError, HandlerError};
pub use events::{Event, EventArgs, EventKey};
pub use handlers::{Affinity, Handler, HandlerSet, Subscribe};
pub use marshal::{InlineMarshal, Job, Marshal, ThreadMarshal, TokioMarshal};
