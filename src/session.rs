//! The per-subscription session: owns the store, the visibility/filter
//! state, the selection tracker and the error-count snapshot, and serves
//! the paged query and the graph projection.
//!
//! The consumption task is the only writer of the store; callers read it
//! concurrently through the query methods. All remaining session state is
//! held in thread-safe cells so consumption-task callbacks and UI-driven
//! mutators never race.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;
use tracing::warn;

use crate::config::DuplicateNamePolicy;
use crate::config::EngineConfig;
use crate::model::displayed_endpoints;
use crate::model::endpoints_tooltip;
use crate::model::ApplicationKey;
use crate::model::DisplayedEndpoint;
use crate::model::Resource;
use crate::model::ResourceChange;
use crate::model::SortKey;
use crate::store::ResourceStore;
use crate::view::order_nested;
use crate::view::project_graph;
use crate::view::ErrorCountTracker;
use crate::view::ResourceGraphDto;
use crate::view::ResourceRow;
use crate::view::SelectionTracker;
use crate::view::TypeVisibility;
use crate::view::VisibilityFilter;
use crate::Result;
use crate::SubscriptionError;

/// One page of the table query plus the total count of visible rows, the
/// figure paging is computed against.
#[derive(Debug, Clone)]
pub struct QueryPage {
    pub rows: Vec<ResourceRow>,
    pub total_visible: usize,
}

pub struct ResourceViewSession {
    store: ResourceStore,
    visibility: VisibilityFilter,
    selection: SelectionTracker,
    error_counts: ErrorCountTracker,
    config: EngineConfig,
    max_highlighted: AtomicUsize,
    graph_active: AtomicBool,
    changes_tx: watch::Sender<u64>,
    graph_changes_tx: watch::Sender<u64>,
}

impl ResourceViewSession {
    pub fn new(config: EngineConfig) -> Self {
        let preselected: Option<HashSet<String>> = config
            .preselected_visible_types
            .as_ref()
            .map(|types| types.iter().cloned().collect());
        let (changes_tx, _) = watch::channel(0);
        let (graph_changes_tx, _) = watch::channel(0);

        Self {
            store: ResourceStore::new(),
            visibility: VisibilityFilter::new(preselected),
            selection: SelectionTracker::new(),
            error_counts: ErrorCountTracker::new(),
            config,
            max_highlighted: AtomicUsize::new(0),
            graph_active: AtomicBool::new(false),
            changes_tx,
            graph_changes_tx,
        }
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn error_counts(&self) -> &ErrorCountTracker {
        &self.error_counts
    }

    //--------------------------------------------------------------
    // Change-feed application (called from the consumption task)

    /// Apply the initial snapshot atomically and register every observed
    /// type. Duplicate names are a provider contract violation, recovered
    /// per the configured policy.
    pub fn apply_snapshot(
        &self,
        snapshot: Vec<Resource>,
    ) -> Result<()> {
        for resource in snapshot {
            self.visibility.register_snapshot_type(&resource.resource_type);

            if self.store.contains(&resource.name) {
                match self.config.duplicate_name_policy {
                    DuplicateNamePolicy::Reject => {
                        return Err(SubscriptionError::DuplicateSnapshotName {
                            name: resource.name,
                        }
                        .into());
                    }
                    DuplicateNamePolicy::Overwrite => {
                        warn!("duplicate name in snapshot, keeping last: {}", resource.name);
                        self.store.upsert(resource);
                    }
                    DuplicateNamePolicy::Ignore => {
                        warn!("duplicate name in snapshot, keeping first: {}", resource.name);
                    }
                }
            } else {
                self.store.upsert(resource);
            }
        }

        self.after_batch();
        Ok(())
    }

    /// Apply one change event. Events within a batch go through here
    /// strictly in arrival order.
    pub fn apply_change(
        &self,
        change: ResourceChange,
    ) {
        match change {
            ResourceChange::Upsert(resource) => {
                self.visibility.register_type(&resource.resource_type);
                let outcome = self.store.upsert(resource);
                debug!("applied upsert: {outcome:?}");
            }
            ResourceChange::Delete(resource) => {
                // Unknown names are non-fatal: log and leave the store as is.
                if let Err(e) = self.store.delete(&resource.name) {
                    warn!("delete failed: {e}");
                }
            }
        }
    }

    /// Post-batch bookkeeping: refresh the highlighted-command cap and
    /// signal consumers that data changed.
    pub fn after_batch(&self) {
        self.recompute_max_highlighted();
        self.changes_tx.send_modify(|generation| *generation += 1);
        if self.graph_active.load(Ordering::Relaxed) {
            self.graph_changes_tx.send_modify(|generation| *generation += 1);
        }
    }

    fn recompute_max_highlighted(&self) {
        let mut max = 0;
        for resource in self.store.snapshot() {
            max = max.max(resource.highlighted_command_count());
        }
        // Too many highlighted commands take up too much space; the rest
        // stay reachable through the command menu.
        let capped = max.min(self.config.max_highlighted_commands);
        self.max_highlighted.store(capped, Ordering::Relaxed);
    }

    //--------------------------------------------------------------
    // Paged table query

    /// Filter, sort, nest and page the current resource set.
    ///
    /// Collapsed subtrees are excluded from both the page and
    /// `total_visible`; a selection referencing a deleted resource simply
    /// resolves to no selection.
    pub fn query(
        &self,
        start_index: usize,
        count: Option<usize>,
        sort_key: SortKey,
    ) -> QueryPage {
        let mut filtered: Vec<Arc<Resource>> = self
            .store
            .snapshot()
            .into_iter()
            .filter(|r| self.visibility.predicate(r))
            .collect();
        filtered.sort_by(|a, b| sort_key.compare(a, b));

        // Rearranging must happen after sorting so nested resources keep
        // the caller's order within each sibling group.
        let ordered = order_nested(filtered, |r| !self.selection.is_expanded(&r.name));

        let visible: Vec<ResourceRow> = ordered.into_iter().filter(|row| !row.is_hidden).collect();
        let total_visible = visible.len();

        let count = count.unwrap_or(self.config.default_page_size);
        let rows = visible.into_iter().skip(start_index).take(count).collect();

        QueryPage { rows, total_visible }
    }

    //--------------------------------------------------------------
    // Visibility mutators

    pub fn type_visibility(&self) -> TypeVisibility {
        self.visibility.type_visibility()
    }

    pub fn set_all_types_visible(
        &self,
        visible: bool,
    ) {
        self.visibility.set_all_types_visible(visible);
    }

    /// Changing a single type's visibility also drops the selection: the
    /// selected resource may no longer be on screen.
    pub fn set_type_visible(
        &self,
        resource_type: &str,
        visible: bool,
    ) {
        self.visibility.set_type_visible(resource_type, visible);
        self.selection.clear();
    }

    pub fn set_filter(
        &self,
        text: impl Into<String>,
    ) {
        self.visibility.set_filter(text);
        self.selection.clear();
    }

    pub fn filter_text(&self) -> String {
        self.visibility.filter_text()
    }

    pub fn known_types(&self) -> Vec<String> {
        self.visibility.known_types()
    }

    pub fn visibility(&self) -> &VisibilityFilter {
        &self.visibility
    }

    //--------------------------------------------------------------
    // Selection

    pub fn select(
        &self,
        name: &str,
    ) -> bool {
        self.selection.select(name, &self.store)
    }

    pub fn clear_selection(&self) {
        self.selection.clear();
    }

    pub fn toggle_expand(
        &self,
        name: &str,
    ) {
        self.selection.toggle_expand(name);
    }

    pub fn selected_resource(&self) -> Option<Arc<Resource>> {
        self.selection.selected_resource(&self.store)
    }

    pub fn is_selected(
        &self,
        name: &str,
    ) -> bool {
        self.selection.is_selected(name)
    }

    //--------------------------------------------------------------
    // Graph projection

    pub fn set_graph_active(
        &self,
        active: bool,
    ) {
        self.graph_active.store(active, Ordering::Relaxed);
    }

    pub fn project_graph(&self) -> Vec<ResourceGraphDto> {
        project_graph(&self.store, &self.visibility)
    }

    //--------------------------------------------------------------
    // Derived display helpers

    pub fn max_highlighted_commands(&self) -> usize {
        self.max_highlighted.load(Ordering::Relaxed)
    }

    pub fn displayed_endpoints(
        &self,
        resource: &Resource,
        include_internal: bool,
    ) -> Vec<DisplayedEndpoint> {
        displayed_endpoints(resource, include_internal)
    }

    pub fn endpoints_tooltip(
        &self,
        resource: &Resource,
    ) -> String {
        endpoints_tooltip(resource)
    }

    pub fn resolved_display_name(
        &self,
        resource: &Resource,
    ) -> String {
        self.store.resolved_display_name(resource)
    }

    pub fn has_multiple_replicas(
        &self,
        resource: &Resource,
    ) -> bool {
        self.store.has_multiple_replicas(resource)
    }

    //--------------------------------------------------------------
    // Change signals

    /// Generation counter bumped after every applied batch
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.changes_tx.subscribe()
    }

    /// Bumped only while a graph consumer is active
    pub fn graph_changes(&self) -> watch::Receiver<u64> {
        self.graph_changes_tx.subscribe()
    }

    /// Refresh the error-count snapshot; bumps the change signal only when
    /// the gate reports an actual difference.
    pub fn refresh_error_counts(
        &self,
        new_counts: HashMap<ApplicationKey, u64>,
    ) -> bool {
        if self.error_counts.refresh(new_counts) {
            self.changes_tx.send_modify(|generation| *generation += 1);
            return true;
        }
        false
    }
}
