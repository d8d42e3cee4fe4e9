//! Tracks the selected resource and the expanded-name set.
//!
//! Selection follows the name, not a resource value: an upsert of the
//! selected name is picked up on the next resolve, and a delete leaves the
//! selection dangling until the query layer resolves it to "no selection".

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::model::Resource;
use crate::store::ResourceStore;

#[derive(Debug, Default)]
struct SelectionState {
    selected: Option<String>,
    expanded: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct SelectionTracker {
    state: RwLock<SelectionState>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `name`, or clear the selection when `name` is already
    /// selected (toggle-off). Selecting expands the whole ancestor chain so
    /// the resource is reachable in the nested view.
    ///
    /// Returns whether a resource is selected afterwards.
    pub fn select(
        &self,
        name: &str,
        store: &ResourceStore,
    ) -> bool {
        let mut state = self.state.write();

        if state.selected.as_deref() == Some(name) {
            debug!("toggle-off selection: {name}");
            state.selected = None;
            return false;
        }

        state.selected = Some(name.to_string());

        // Walk the parent chain, expanding every resolvable ancestor. The
        // iteration cap guards against malformed cyclic chains.
        let mut current = name.to_string();
        for _ in 0..store.len() {
            let Some(parent) = store.try_get(&current).and_then(|r| r.parent_name.clone()) else {
                break;
            };
            if parent.is_empty() || !store.contains(&parent) {
                break;
            }
            state.expanded.insert(parent.clone());
            current = parent;
        }

        true
    }

    /// Drop the selection; expansions are left as they are.
    pub fn clear(&self) {
        self.state.write().selected = None;
    }

    pub fn toggle_expand(
        &self,
        name: &str,
    ) {
        let mut state = self.state.write();
        if !state.expanded.remove(name) {
            state.expanded.insert(name.to_string());
        }
    }

    pub fn is_expanded(
        &self,
        name: &str,
    ) -> bool {
        self.state.read().expanded.contains(name)
    }

    pub fn selected_name(&self) -> Option<String> {
        self.state.read().selected.clone()
    }

    pub fn is_selected(
        &self,
        name: &str,
    ) -> bool {
        self.state.read().selected.as_deref() == Some(name)
    }

    /// Resolve the selection against the store. A selection referencing a
    /// now-absent name reads as no selection.
    pub fn selected_resource(
        &self,
        store: &ResourceStore,
    ) -> Option<Arc<Resource>> {
        let name = self.state.read().selected.clone()?;
        store.try_get(&name)
    }
}
