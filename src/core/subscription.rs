//! One registered target: weak reference, resolved handler map, fire-once
//! bookkeeping, and the invocation boundary.

use std::any::Any;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Weak;

use parking_lot::Mutex;
use tracing::error;

use crate::events::{Event, EventKey};
use crate::handlers::{Affinity, HandlerMap, Subscribe};
use crate::marshal::Marshal;

/// Mutable bookkeeping: remaining handlers and consumed fire-once keys.
struct State {
    handlers: HandlerMap,
    fired: HashSet<EventKey>,
}

/// One registered target with its resolved handlers.
///
/// The target is held weakly; every path through [`invoke`](Subscription::invoke)
/// re-checks liveness and silently no-ops once the last external owner has
/// dropped the target.
pub(crate) struct Subscription {
    target: Weak<dyn Subscribe>,
    name: &'static str,
    state: Mutex<State>,
}

impl Subscription {
    pub(crate) fn new(
        target: Weak<dyn Subscribe>,
        name: &'static str,
        handlers: HandlerMap,
    ) -> Self {
        Self {
            target,
            name,
            state: Mutex::new(State {
                handlers,
                fired: HashSet::new(),
            }),
        }
    }

    /// True while the owning target is still alive.
    pub(crate) fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// True when the remaining handler map contains `key`.
    pub(crate) fn handles(&self, key: &EventKey) -> bool {
        self.state.lock().handlers.contains_key(key)
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    /// Delivers `event` to this target's handler for the event's key.
    ///
    /// A dead target or an absent handler is a silent no-op. Fire-once
    /// consumption happens here, at scheduling time, atomically with the
    /// lookup: a main-affine once handler is consumed before its deferred
    /// job runs, and concurrent invokers cannot double-fire it.
    pub(crate) fn invoke(&self, event: &Event, marshal: &dyn Marshal) {
        let target = match self.target.upgrade() {
            Some(target) => target,
            None => return,
        };

        let spec = {
            let mut state = self.state.lock();
            let spec = match state.handlers.get(&event.key) {
                Some(spec) => spec.clone(),
                None => return,
            };
            if spec.once && !state.fired.contains(&event.key) {
                state.fired.insert(event.key.clone());
                state.handlers.remove(&event.key);
            }
            spec
        };

        match spec.affinity {
            Affinity::Main => {
                // The job holds the target weakly: a pending main-thread
                // delivery must not extend the listener's lifetime.
                let weak = Weak::clone(&self.target);
                let name = self.name;
                let event = event.clone();
                marshal.submit(Box::new(move || {
                    if let Some(target) = weak.upgrade() {
                        deliver_checked(target.as_ref(), name, &event);
                    }
                }));
            }
            Affinity::Caller => deliver_checked(target.as_ref(), self.name, event),
        }
    }
}

/// Invocation boundary: handler failures and panics are reported through the
/// diagnostics channel and never propagate into the dispatch loop.
fn deliver_checked(target: &dyn Subscribe, name: &'static str, event: &Event) {
    match catch_unwind(AssertUnwindSafe(|| target.deliver(event))) {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            error!(
                subscriber = name,
                key = %event.key,
                label = err.as_label(),
                %err,
                "handler failed"
            );
        }
        Err(panic) => {
            error!(
                subscriber = name,
                key = %event.key,
                panic = %panic_message(panic.as_ref()),
                "handler panicked"
            );
        }
    }
}

/// Best-effort extraction of a panic payload message.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::HandlerError;
    use crate::handlers::{scan, Handler, HandlerSet};
    use crate::marshal::{InlineMarshal, Job};

    /// Marshal double that queues jobs for manual execution.
    #[derive(Default)]
    struct RecordingMarshal {
        jobs: Mutex<Vec<Job>>,
    }

    impl RecordingMarshal {
        fn run_all(&self) {
            let jobs: Vec<Job> = std::mem::take(&mut *self.jobs.lock());
            for job in jobs {
                job();
            }
        }

        fn queued(&self) -> usize {
            self.jobs.lock().len()
        }
    }

    impl Marshal for RecordingMarshal {
        fn submit(&self, job: Job) {
            self.jobs.lock().push(job);
        }
    }

    /// Probe target recording delivered keys into shared storage.
    struct Probe {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl Subscribe for Probe {
        fn handlers() -> HandlerSet {
            HandlerSet::for_type::<Self>()
                .with(Handler::on("probe.sync"))
                .with(Handler::on_main("probe.main").once())
                .with(Handler::on("probe.panic"))
                .with(Handler::on("probe.fail"))
        }

        fn deliver(&self, event: &Event) -> Result<(), HandlerError> {
            match event.key.as_str() {
                "probe.sync" | "probe.main" => {
                    self.seen.lock().push(event.key.as_str().to_string());
                    Ok(())
                }
                "probe.panic" => panic!("probe exploded"),
                "probe.fail" => Err(HandlerError::failed("probe refused")),
                _ => Err(HandlerError::Unhandled {
                    key: event.key.clone(),
                }),
            }
        }

        fn name(&self) -> &'static str {
            "probe"
        }
    }

    fn subscription_for(probe: &Arc<Probe>) -> Subscription {
        let weak: Weak<dyn Subscribe> = {
            let weak_t: Weak<Probe> = Arc::downgrade(probe);
            weak_t
        };
        let map = scan(&Probe::handlers(), false, &[], "probe").unwrap();
        Subscription::new(weak, "probe", map)
    }

    fn probe() -> (Arc<Probe>, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let probe = Arc::new(Probe {
            seen: Arc::clone(&seen),
        });
        (probe, seen)
    }

    #[test]
    fn caller_affinity_delivers_synchronously() {
        let (probe, seen) = probe();
        let sub = subscription_for(&probe);

        sub.invoke(&Event::new("probe.sync"), &InlineMarshal);
        assert_eq!(*seen.lock(), ["probe.sync"]);
    }

    #[test]
    fn fire_once_is_consumed_at_scheduling_time() {
        let (probe, seen) = probe();
        let sub = subscription_for(&probe);
        let marshal = RecordingMarshal::default();
        let key = EventKey::new("probe.main");

        sub.invoke(&Event::new("probe.main"), &marshal);
        // Consumed before the deferred job has run.
        assert!(!sub.handles(&key));
        assert!(seen.lock().is_empty());

        // A second schedule finds no handler.
        sub.invoke(&Event::new("probe.main"), &marshal);
        assert_eq!(marshal.queued(), 1);

        marshal.run_all();
        assert_eq!(*seen.lock(), ["probe.main"]);
    }

    #[test]
    fn dead_target_is_a_silent_noop() {
        let (probe, seen) = probe();
        let sub = subscription_for(&probe);
        drop(probe);

        assert!(!sub.is_alive());
        sub.invoke(&Event::new("probe.sync"), &InlineMarshal);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn deferred_job_skips_a_target_that_died_meanwhile() {
        let (probe, seen) = probe();
        let sub = subscription_for(&probe);
        let marshal = RecordingMarshal::default();

        sub.invoke(&Event::new("probe.main"), &marshal);
        drop(probe);
        marshal.run_all();
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn handler_panic_and_error_do_not_propagate() {
        let (probe, seen) = probe();
        let sub = subscription_for(&probe);

        sub.invoke(&Event::new("probe.panic"), &InlineMarshal);
        sub.invoke(&Event::new("probe.fail"), &InlineMarshal);
        sub.invoke(&Event::new("probe.sync"), &InlineMarshal);
        assert_eq!(*seen.lock(), ["probe.sync"]);
    }

    #[test]
    fn unknown_key_is_a_noop() {
        let (probe, seen) = probe();
        let sub = subscription_for(&probe);

        sub.invoke(&Event::new("probe.unknown"), &InlineMarshal);
        assert!(seen.lock().is_empty());
    }
}
