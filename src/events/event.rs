use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::events::{EventArgs, EventKey};

/// Global sequence counter for event ordering in traces.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// A posted event: normalized key plus shared argument list.
///
/// `seq` is a globally unique, monotonically increasing sequence number and
/// `at` a wall-clock stamp; both exist for diagnostics only and have no
/// dispatch semantics. Cloning is cheap: the arguments are shared, not
/// copied.
///
/// ## Example
/// ```
/// use eventcast::Event;
///
/// let ev = Event::new("Player.Seek ").with_arg(42u64).with_arg(1.5f32);
///
/// assert_eq!(ev.key.as_str(), "player.seek");
/// assert_eq!(*ev.args.get::<u64>(0).unwrap(), 42);
/// ```
#[derive(Clone, Debug)]
pub struct Event {
    /// Normalized event key.
    pub key: EventKey,
    /// Arguments for the receiving handler.
    pub args: EventArgs,
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
}

impl Event {
    /// Creates an event for `key` with no arguments, stamped with the next
    /// sequence number and the current time.
    pub fn new(key: impl Into<EventKey>) -> Self {
        Self {
            key: key.into(),
            args: EventArgs::new(),
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
        }
    }

    /// Appends one argument.
    #[inline]
    pub fn with_arg<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.args.push(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new("a");
        let b = Event::new("b");
        assert!(b.seq > a.seq);
    }

    #[test]
    fn clones_share_arguments() {
        let ev = Event::new("k").with_arg(String::from("shared"));
        let copy = ev.clone();
        assert_eq!(copy.args.get::<String>(0).unwrap(), "shared");
        assert_eq!(copy.seq, ev.seq);
    }
}
