//! # The dispatcher facade.
//!
//! Wires the registry, the per-thread queues and the marshaller behind the
//! public `register` / `unregister` / `post` surface.
//!
//! ## Architecture
//! ```text
//! post(Event) ──► Registry::resolve ──► [per-thread FIFO] ──► drain
//!                  (skip ignored,             │                 │
//!                   skip dead weak)           │      Subscription::invoke
//!                                             │            │
//!                              nested post ───┘     ┌──────┴──────┐
//!                              (same queue,         ▼             ▼
//!                               same drain)   caller thread   Marshal::submit
//! ```
//!
//! ## Rules
//! - One dispatcher per process (or per isolated subsystem), constructed
//!   explicitly via [`Dispatcher::builder`] and shared by `Arc`; there is no
//!   implicit global instance.
//! - `post` returns after same-thread deliveries complete; main-affine
//!   deliveries are scheduled and not awaited.
//! - A `post` from inside a handler never nests a drain: it enqueues onto
//!   the running loop and returns.

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Weak};

use tracing::trace;

use crate::config::Config;
use crate::core::queue::{self, PendingEvent};
use crate::core::registry::{Registry, TargetId};
use crate::core::subscription::Subscription;
use crate::error::DispatchError;
use crate::events::{Event, EventKey};
use crate::handlers::{scan, Subscribe};
use crate::marshal::{InlineMarshal, Marshal};

/// In-process publish/subscribe dispatcher.
///
/// Targets implement [`Subscribe`], are owned externally as `Arc<T>`, and
/// are held weakly here: dropping the last external reference silently ends
/// delivery, registration never extends a listener's lifetime.
///
/// See the crate docs for a full wiring example.
pub struct Dispatcher {
    registry: Registry,
    marshal: Arc<dyn Marshal>,
    config: Config,
    trace_enabled: AtomicBool,
}

impl Dispatcher {
    /// Starts a builder.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Dispatcher with the default configuration and the inline marshaller.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Registers `target`'s own handler declarations.
    ///
    /// A no-op when the target is already registered: the existing
    /// subscription is neither re-scanned nor replaced. Declaration defects
    /// fail registration and leave the registry unchanged.
    pub fn register<T: Subscribe>(&self, target: &Arc<T>) -> Result<(), DispatchError> {
        self.register_scanned(target, false)
    }

    /// Registers `target` including its chained base declarations.
    ///
    /// Base groups are walked in declaration order up to the first origin in
    /// a foreign namespace (see [`Config::foreign_namespaces`]). Otherwise
    /// identical to [`register`](Self::register).
    pub fn register_deep<T: Subscribe>(&self, target: &Arc<T>) -> Result<(), DispatchError> {
        self.register_scanned(target, true)
    }

    fn register_scanned<T: Subscribe>(
        &self,
        target: &Arc<T>,
        deep: bool,
    ) -> Result<(), DispatchError> {
        let id = Self::target_id(target);
        let name = target.name();

        if self.registry.contains_live(id) {
            if self.trace_on() {
                trace!(subscriber = name, "register: already registered, no-op");
            }
            return Ok(());
        }

        let map = scan(
            &T::handlers(),
            deep,
            &self.config.foreign_namespaces,
            name,
        )?;
        let weak: Weak<dyn Subscribe> = {
            let weak_t: Weak<T> = Arc::downgrade(target);
            weak_t
        };
        let inserted = self
            .registry
            .insert(id, Arc::new(Subscription::new(weak, name, map)));

        if self.trace_on() {
            trace!(subscriber = name, deep, inserted, "register");
        }
        Ok(())
    }

    /// Unregisters `target`: drops its subscription and its ignore set.
    ///
    /// Unregistering a target that was never registered is a no-op.
    pub fn unregister<T: Subscribe>(&self, target: &Arc<T>) {
        let removed = self.registry.remove(Self::target_id(target));
        if self.trace_on() {
            trace!(subscriber = target.name(), removed, "unregister");
        }
    }

    /// Suppresses future deliveries of `key` to `target`.
    ///
    /// A key that is empty after normalization degrades to a full
    /// [`unregister`](Self::unregister). The suppression is additive-only
    /// (no API removes a recorded key short of a full unregister) and it
    /// survives redundant re-registration. No effect when the target is not
    /// registered.
    pub fn unregister_event<T: Subscribe>(&self, target: &Arc<T>, key: &str) {
        let key = EventKey::new(key);
        if key.is_empty() {
            self.unregister(target);
            return;
        }

        let recorded = self.registry.ignore(Self::target_id(target), key.clone());
        if self.trace_on() {
            trace!(subscriber = target.name(), key = %key, recorded, "ignore");
        }
    }

    /// Posts `event` to every registered target with a live handler for its
    /// key, excluding targets that suppress the key.
    ///
    /// Matching caller-affine handlers run on this thread before this call
    /// returns; main-affine handlers are scheduled on the marshaller and not
    /// awaited. Posting from inside a handler enqueues onto the running
    /// drain and returns immediately; every such delivery is still processed
    /// within the outermost `post` on this thread.
    pub fn post(&self, event: Event) -> Result<(), DispatchError> {
        if event.key.is_empty() {
            return Err(DispatchError::EmptyEventKey);
        }

        let matches = self.registry.resolve(&event.key);
        if self.trace_on() {
            trace!(key = %event.key, seq = event.seq, matches = matches.len(), "post");
        }

        for subscription in matches {
            queue::enqueue(PendingEvent {
                event: event.clone(),
                subscription,
            });
        }

        queue::drain(|pending| {
            if self.trace_on() {
                trace!(
                    subscriber = pending.subscription.name(),
                    key = %pending.event.key,
                    "dispatch"
                );
            }
            pending
                .subscription
                .invoke(&pending.event, self.marshal.as_ref());
        });
        Ok(())
    }

    /// Toggles verbose tracing of register/unregister/ignore/post/dispatch.
    ///
    /// Purely diagnostic, no behavioral effect. Handler failures are
    /// reported regardless of this flag.
    pub fn set_trace_enabled(&self, enabled: bool) {
        self.trace_enabled.store(enabled, AtomicOrdering::Relaxed);
    }

    #[inline]
    fn trace_on(&self) -> bool {
        self.trace_enabled.load(AtomicOrdering::Relaxed)
    }

    fn target_id<T: Subscribe>(target: &Arc<T>) -> TargetId {
        Arc::as_ptr(target) as *const () as TargetId
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing a [`Dispatcher`].
pub struct DispatcherBuilder {
    config: Config,
    marshal: Option<Arc<dyn Marshal>>,
}

impl DispatcherBuilder {
    fn new() -> Self {
        Self {
            config: Config::default(),
            marshal: None,
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the serial context for main-affine handlers.
    ///
    /// Defaults to [`InlineMarshal`], which degrades main affinity to the
    /// posting thread.
    pub fn with_marshal(mut self, marshal: Arc<dyn Marshal>) -> Self {
        self.marshal = Some(marshal);
        self
    }

    /// Builds the dispatcher.
    pub fn build(self) -> Dispatcher {
        let trace = self.config.trace;
        Dispatcher {
            registry: Registry::new(),
            marshal: self.marshal.unwrap_or_else(|| Arc::new(InlineMarshal)),
            config: self.config,
            trace_enabled: AtomicBool::new(trace),
        }
    }
}
