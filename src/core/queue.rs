//! Per-thread pending-event queue and drain guard.
//!
//! Each posting thread owns a private FIFO of resolved deliveries plus a
//! drain-in-progress flag. A `post` from inside a handler enqueues onto the
//! same queue and returns immediately; the outermost drain picks the entry
//! up, so nested posts are processed breadth-first and never recurse.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::core::subscription::Subscription;
use crate::events::Event;

/// One resolved delivery waiting on the posting thread.
pub(crate) struct PendingEvent {
    pub(crate) event: Event,
    pub(crate) subscription: Arc<Subscription>,
}

thread_local! {
    static PENDING: RefCell<VecDeque<PendingEvent>> = RefCell::new(VecDeque::new());
    static DRAINING: Cell<bool> = const { Cell::new(false) };
}

/// Appends one delivery to the calling thread's queue. Never blocks.
pub(crate) fn enqueue(pending: PendingEvent) {
    PENDING.with(|q| q.borrow_mut().push_back(pending));
}

/// Clears the drain flag even when a dispatch unwinds.
struct DrainGuard;

impl DrainGuard {
    /// Sets the flag; `None` when a drain is already running on this thread.
    fn acquire() -> Option<Self> {
        DRAINING.with(|flag| {
            if flag.get() {
                None
            } else {
                flag.set(true);
                Some(DrainGuard)
            }
        })
    }
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        DRAINING.with(|flag| flag.set(false));
    }
}

/// Drains the calling thread's queue unless a drain is already in progress
/// higher up the stack, in which case the call defers to the outer loop and
/// returns immediately.
///
/// Deliveries enqueued by handlers invoked during the drain join the same
/// queue and are processed before this call returns.
pub(crate) fn drain(mut dispatch: impl FnMut(PendingEvent)) {
    let Some(_guard) = DrainGuard::acquire() else {
        return;
    };

    while let Some(next) = PENDING.with(|q| q.borrow_mut().pop_front()) {
        dispatch(next);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Weak;

    use super::*;
    use crate::error::HandlerError;
    use crate::handlers::{HandlerMap, HandlerSet, Subscribe};

    struct Null;

    impl Subscribe for Null {
        fn handlers() -> HandlerSet {
            HandlerSet::for_type::<Self>()
        }

        fn deliver(&self, _event: &Event) -> Result<(), HandlerError> {
            Ok(())
        }
    }

    fn pending(key: &str) -> PendingEvent {
        let target = Arc::new(Null);
        let weak: Weak<dyn Subscribe> = {
            let weak_t: Weak<Null> = Arc::downgrade(&target);
            weak_t
        };
        PendingEvent {
            event: Event::new(key),
            subscription: Arc::new(Subscription::new(weak, "null", HandlerMap::new())),
        }
    }

    fn keys_seen(seen: &[PendingEvent]) -> Vec<&str> {
        seen.iter().map(|p| p.event.key.as_str()).collect()
    }

    #[test]
    fn drains_in_fifo_order() {
        enqueue(pending("a"));
        enqueue(pending("b"));
        enqueue(pending("c"));

        let mut seen = Vec::new();
        drain(|p| seen.push(p));
        assert_eq!(keys_seen(&seen), ["a", "b", "c"]);
    }

    #[test]
    fn nested_drain_defers_to_the_outer_loop() {
        enqueue(pending("first"));

        let mut seen = Vec::new();
        drain(|p| {
            if p.event.key.as_str() == "first" {
                enqueue(pending("second"));
                drain(|_| panic!("nested drain must not run"));
            }
            seen.push(p);
        });
        assert_eq!(keys_seen(&seen), ["first", "second"]);
    }

    #[test]
    fn flag_clears_between_drains() {
        enqueue(pending("one"));
        let mut seen = Vec::new();
        drain(|p| seen.push(p));

        enqueue(pending("two"));
        drain(|p| seen.push(p));
        assert_eq!(keys_seen(&seen), ["one", "two"]);
    }

    #[test]
    fn flag_clears_when_a_dispatch_unwinds() {
        enqueue(pending("boom"));
        let unwound = std::panic::catch_unwind(|| drain(|_| panic!("boom")));
        assert!(unwound.is_err());

        enqueue(pending("after"));
        let mut seen = Vec::new();
        drain(|p| seen.push(p));
        assert_eq!(keys_seen(&seen), ["after"]);
    }
}
