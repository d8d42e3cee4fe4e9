//! Tracks known resource types, the user-selected visible subset and the
//! free-text filter, and exposes the pure visibility predicate used by
//! queries and the graph projector.
//!
//! The type registries are concurrent sets because the consumption task
//! registers types while caller tasks evaluate the predicate; everything
//! else about this state belongs to the owning session.

use std::collections::HashSet;

use dashmap::DashSet;
use parking_lot::RwLock;

use crate::model::Resource;

/// Tri-state "all types visible" indicator. `Mixed` is derived-only and can
/// never be set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeVisibility {
    /// Every known type is visible
    All,
    /// No type is visible
    None,
    /// A proper, non-empty subset is visible
    Mixed,
}

pub struct VisibilityFilter {
    /// Every type ever observed. Grows only; survives deletion of the last
    /// instance of a type.
    all_types: DashSet<String>,
    /// User-controlled subset of `all_types`
    visible_types: DashSet<String>,
    filter: RwLock<String>,
    /// Startup bias: when set, only these types auto-opt-in during the
    /// snapshot; every other type starts hidden.
    preselected: Option<HashSet<String>>,
}

impl VisibilityFilter {
    pub fn new(preselected: Option<HashSet<String>>) -> Self {
        Self {
            all_types: DashSet::new(),
            visible_types: DashSet::new(),
            filter: RwLock::new(String::new()),
            preselected,
        }
    }

    /// Register a type observed in the initial snapshot. The preselection
    /// bias applies here: a biased type set keeps everything else hidden.
    ///
    /// Returns whether the type had never been seen before.
    pub fn register_snapshot_type(
        &self,
        resource_type: &str,
    ) -> bool {
        let newly_seen = self.all_types.insert(resource_type.to_string());
        let opt_in = match &self.preselected {
            Some(preselected) => preselected.contains(resource_type),
            None => true,
        };
        if opt_in {
            self.visible_types.insert(resource_type.to_string());
        }
        newly_seen
    }

    /// Register a type observed on the change stream. The auto-opt-in
    /// applies only the first time a type is ever seen: re-appearance of a
    /// type the user hid never re-adds it.
    ///
    /// Returns whether the type had never been seen before.
    pub fn register_type(
        &self,
        resource_type: &str,
    ) -> bool {
        if self.all_types.insert(resource_type.to_string()) {
            self.visible_types.insert(resource_type.to_string());
            return true;
        }
        false
    }

    /// The visibility predicate. Depends only on the visible-type set, the
    /// filter text and the resource itself.
    pub fn predicate(
        &self,
        resource: &Resource,
    ) -> bool {
        if !self.visible_types.contains(&resource.resource_type) {
            return false;
        }
        if resource.is_hidden_state() {
            return false;
        }
        let filter = self.filter.read();
        filter.is_empty() || resource.matches_filter(&filter)
    }

    /// Order-independent set comparison of visible against known types.
    pub fn type_visibility(&self) -> TypeVisibility {
        if self.visible_types.is_empty() {
            // An empty registry means nothing was ever observed; the sets
            // are equal and the indicator reads as all-visible.
            if self.all_types.is_empty() {
                return TypeVisibility::All;
            }
            return TypeVisibility::None;
        }

        let all_visible = self.visible_types.len() == self.all_types.len()
            && self.all_types.iter().all(|t| self.visible_types.contains(t.key()));
        if all_visible {
            TypeVisibility::All
        } else {
            TypeVisibility::Mixed
        }
    }

    /// Setting `true` unions every known type into the visible set; `false`
    /// clears it. The mixed state is read-only.
    pub fn set_all_types_visible(
        &self,
        visible: bool,
    ) {
        if visible {
            for t in self.all_types.iter() {
                self.visible_types.insert(t.key().clone());
            }
        } else {
            self.visible_types.clear();
        }
    }

    pub fn set_type_visible(
        &self,
        resource_type: &str,
        visible: bool,
    ) {
        if visible {
            self.visible_types.insert(resource_type.to_string());
        } else {
            self.visible_types.remove(resource_type);
        }
    }

    pub fn is_type_visible(
        &self,
        resource_type: &str,
    ) -> bool {
        self.visible_types.contains(resource_type)
    }

    pub fn known_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.all_types.iter().map(|t| t.key().clone()).collect();
        types.sort();
        types
    }

    pub fn set_filter(
        &self,
        text: impl Into<String>,
    ) {
        *self.filter.write() = text.into();
    }

    pub fn filter_text(&self) -> String {
        self.filter.read().clone()
    }
}
