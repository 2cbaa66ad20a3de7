//! Catalog resolution: validates a [`HandlerSet`] declaration and flattens it
//! into the per-target handler map consulted at dispatch time.

use std::collections::HashMap;

use crate::error::DispatchError;
use crate::events::EventKey;
use crate::handlers::{Affinity, Handler, HandlerSet};

/// Resolved `event key → handler` map for one target.
pub(crate) type HandlerMap = HashMap<EventKey, Handler>;

/// Flattens `set` into a handler map.
///
/// Walks the own-declaration group, then (when `deep`) base groups in
/// declaration order, stopping at the first group whose origin starts with
/// one of the `foreign` prefixes: scanning never crosses into platform or
/// standard-library declarations. Keys collide last-scanned-wins (a base
/// group overrides an earlier one); re-declaring a key within one group
/// under a different affinity is a configuration defect and fails the scan.
pub(crate) fn scan(
    set: &HandlerSet,
    deep: bool,
    foreign: &[String],
    target: &'static str,
) -> Result<HandlerMap, DispatchError> {
    let mut map = HandlerMap::new();

    for (depth, group) in set.groups.iter().enumerate() {
        if depth > 0 {
            if !deep {
                break;
            }
            if foreign.iter().any(|p| group.origin.starts_with(p.as_str())) {
                break;
            }
        }

        let mut seen: HashMap<EventKey, Affinity> = HashMap::new();
        for handler in &group.handlers {
            if handler.key.is_empty() {
                return Err(DispatchError::EmptyHandlerKey { target });
            }
            if let Some(prev) = seen.insert(handler.key.clone(), handler.affinity) {
                if prev != handler.affinity {
                    return Err(DispatchError::ConflictingAffinity {
                        target,
                        key: handler.key.clone(),
                    });
                }
            }
            map.insert(handler.key.clone(), handler.clone());
        }
    }

    Ok(map)
}
