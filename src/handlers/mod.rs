//! # Handler declaration surface.
//!
//! Listener types declare what they handle instead of being reflected over:
//!
//! ```text
//! impl Subscribe ── handlers() ──► HandlerSet ── scan ──► key → Handler map
//!        │                        (own group +             (validated at
//!        └── deliver(&Event) ◄──── base groups)             registration)
//! ```
//!
//! - [`Subscribe`] — the listener trait: static catalog + `deliver` routing
//! - [`HandlerSet`] / [`Handler`] / [`Affinity`] — the declarative catalog
//! - [`catalog`](self) — registration-time scan with defect validation

mod catalog;
mod set;
mod subscribe;

pub(crate) use catalog::{scan, HandlerMap};
pub use set::{Affinity, Handler, HandlerSet};
pub use subscribe::Subscribe;
