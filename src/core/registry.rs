//! Process-wide table of registered targets.
//!
//! Entries are weak: the registry must never be the reason a listener
//! outlives its owner. Dead entries are pruned lazily during resolution and
//! replaced on registration at a reused address.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::subscription::Subscription;
use crate::events::EventKey;

/// Registration identity: the target's `Arc` data pointer address.
pub(crate) type TargetId = usize;

struct Entry {
    subscription: Arc<Subscription>,
    /// Additive-only suppression set; `None` until the first ignore call.
    ignored: Option<HashSet<EventKey>>,
}

#[derive(Default)]
pub(crate) struct Registry {
    entries: RwLock<HashMap<TargetId, Entry>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// True when `id` maps to an entry whose target is still alive.
    pub(crate) fn contains_live(&self, id: TargetId) -> bool {
        self.entries
            .read()
            .get(&id)
            .is_some_and(|e| e.subscription.is_alive())
    }

    /// Inserts `subscription` under `id` unless a live entry already exists.
    ///
    /// Returns `false` for the already-registered no-op. A dead entry at a
    /// reused address is replaced.
    pub(crate) fn insert(&self, id: TargetId, subscription: Arc<Subscription>) -> bool {
        let mut entries = self.entries.write();
        if let Some(existing) = entries.get(&id) {
            if existing.subscription.is_alive() {
                return false;
            }
        }
        entries.insert(
            id,
            Entry {
                subscription,
                ignored: None,
            },
        );
        true
    }

    /// Removes the entry and its ignore set. Absent entries are a no-op.
    pub(crate) fn remove(&self, id: TargetId) -> bool {
        self.entries.write().remove(&id).is_some()
    }

    /// Records `key` in the target's ignore set, creating the set lazily.
    ///
    /// No effect when the target has no live entry. Additive-only: nothing
    /// removes a recorded key short of a full [`remove`](Self::remove).
    pub(crate) fn ignore(&self, id: TargetId, key: EventKey) -> bool {
        let mut entries = self.entries.write();
        match entries.get_mut(&id) {
            Some(entry) if entry.subscription.is_alive() => {
                entry.ignored.get_or_insert_with(HashSet::new).insert(key);
                true
            }
            _ => false,
        }
    }

    /// Point-in-time snapshot of the live subscriptions handling `key`,
    /// excluding targets that suppress it. Enumeration order is unspecified.
    ///
    /// Dead entries observed on the way are pruned.
    pub(crate) fn resolve(&self, key: &EventKey) -> Vec<Arc<Subscription>> {
        let mut matches = Vec::new();
        let mut dead: Vec<TargetId> = Vec::new();
        {
            let entries = self.entries.read();
            for (id, entry) in entries.iter() {
                if !entry.subscription.is_alive() {
                    dead.push(*id);
                    continue;
                }
                if entry.ignored.as_ref().is_some_and(|set| set.contains(key)) {
                    continue;
                }
                if entry.subscription.handles(key) {
                    matches.push(Arc::clone(&entry.subscription));
                }
            }
        }

        if !dead.is_empty() {
            let mut entries = self.entries.write();
            for id in dead {
                // Re-check under the write lock: the address may have been
                // re-registered by a new target in the meantime.
                if let Some(entry) = entries.get(&id) {
                    if !entry.subscription.is_alive() {
                        entries.remove(&id);
                    }
                }
            }
        }

        matches
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Weak;

    use super::*;
    use crate::error::HandlerError;
    use crate::events::Event;
    use crate::handlers::{scan, Handler, HandlerSet, Subscribe};

    struct Listener;

    impl Subscribe for Listener {
        fn handlers() -> HandlerSet {
            HandlerSet::for_type::<Self>().with(Handler::on("doc.saved"))
        }

        fn deliver(&self, _event: &Event) -> Result<(), HandlerError> {
            Ok(())
        }
    }

    fn subscription(target: &Arc<Listener>) -> Arc<Subscription> {
        let weak: Weak<dyn Subscribe> = {
            let weak_t: Weak<Listener> = Arc::downgrade(target);
            weak_t
        };
        let map = scan(&Listener::handlers(), false, &[], "listener").unwrap();
        Arc::new(Subscription::new(weak, "listener", map))
    }

    fn id_of(target: &Arc<Listener>) -> TargetId {
        Arc::as_ptr(target) as *const () as TargetId
    }

    #[test]
    fn insert_is_a_noop_while_the_entry_is_alive() {
        let registry = Registry::new();
        let target = Arc::new(Listener);

        assert!(registry.insert(id_of(&target), subscription(&target)));
        assert!(!registry.insert(id_of(&target), subscription(&target)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn a_dead_entry_at_a_reused_address_is_replaced() {
        let registry = Registry::new();
        let target = Arc::new(Listener);
        let id = id_of(&target);

        registry.insert(id, subscription(&target));
        drop(target);

        let fresh = Arc::new(Listener);
        // Register the new target under the old id to model address reuse.
        assert!(registry.insert(id, subscription(&fresh)));
        assert!(registry.contains_live(id));
    }

    #[test]
    fn resolve_matches_handlers_and_skips_ignored() {
        let registry = Registry::new();
        let target = Arc::new(Listener);
        let id = id_of(&target);
        registry.insert(id, subscription(&target));

        let key = EventKey::new("doc.saved");
        assert_eq!(registry.resolve(&key).len(), 1);
        assert!(registry.resolve(&EventKey::new("doc.closed")).is_empty());

        assert!(registry.ignore(id, key.clone()));
        assert!(registry.resolve(&key).is_empty());
    }

    #[test]
    fn ignore_without_a_live_entry_records_nothing() {
        let registry = Registry::new();
        assert!(!registry.ignore(0xdead, EventKey::new("doc.saved")));
    }

    #[test]
    fn ignoring_an_undeclared_key_is_inert() {
        let registry = Registry::new();
        let target = Arc::new(Listener);
        let id = id_of(&target);
        registry.insert(id, subscription(&target));

        assert!(registry.ignore(id, EventKey::new("never.declared")));
        // The declared key still resolves.
        assert_eq!(registry.resolve(&EventKey::new("doc.saved")).len(), 1);
    }

    #[test]
    fn resolve_prunes_dead_entries() {
        let registry = Registry::new();
        let target = Arc::new(Listener);
        registry.insert(id_of(&target), subscription(&target));
        drop(target);

        assert!(registry.resolve(&EventKey::new("doc.saved")).is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn remove_drops_entry_and_ignore_set() {
        let registry = Registry::new();
        let target = Arc::new(Listener);
        let id = id_of(&target);
        registry.insert(id, subscription(&target));
        registry.ignore(id, EventKey::new("doc.saved"));

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert_eq!(registry.len(), 0);
    }
}
