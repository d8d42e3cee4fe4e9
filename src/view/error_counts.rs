//! Per-application unviewed-error counts with diff-aware refresh.
//!
//! The snapshot is replaced wholesale whenever the external log store
//! signals new logs; the change gate keeps consumers from repainting when
//! totals are unchanged.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::debug;

use crate::model::ApplicationKey;

#[derive(Debug, Default)]
pub struct ErrorCountTracker {
    counts: ArcSwap<HashMap<ApplicationKey, u64>>,
}

impl ErrorCountTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff the key sets differ or any shared key's count differs.
    /// Ordering of the maps is irrelevant.
    pub fn counts_changed(
        old: &HashMap<ApplicationKey, u64>,
        new: &HashMap<ApplicationKey, u64>,
    ) -> bool {
        if old.len() != new.len() {
            return true;
        }
        new.iter().any(|(key, count)| old.get(key) != Some(count))
    }

    /// Swap in a fresh snapshot. Returns whether anything changed, which is
    /// the caller's cue to trigger a refresh downstream.
    pub fn refresh(
        &self,
        new_counts: HashMap<ApplicationKey, u64>,
    ) -> bool {
        let old = self.counts.load();
        if !Self::counts_changed(&old, &new_counts) {
            debug!("error counts unchanged; skipping refresh");
            return false;
        }
        self.counts.store(Arc::new(new_counts));
        true
    }

    pub fn count_for(
        &self,
        key: &ApplicationKey,
    ) -> u64 {
        self.counts.load().get(key).copied().unwrap_or(0)
    }

    pub fn snapshot(&self) -> Arc<HashMap<ApplicationKey, u64>> {
        self.counts.load_full()
    }
}
