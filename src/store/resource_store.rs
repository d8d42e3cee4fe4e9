//! Concurrent name-keyed resource index: the single mutable shared resource
//! of a view session.
//!
//! One consumption task writes, many caller tasks read. DashMap sharding
//! keeps readers from ever blocking the writer; reads observe some
//! prior-applied prefix of the change feed (monotonic), never a state that
//! never existed, and make no linearizability promise against in-flight
//! writes.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::trace;

use crate::model::Resource;
use crate::StoreError;

/// Outcome of an upsert: whether the name was new to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

#[derive(Debug, Default)]
pub struct ResourceStore {
    by_name: DashMap<String, Arc<Resource>>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self {
            by_name: DashMap::new(),
        }
    }

    /// Insert or fully replace the resource under its name.
    /// Replacement is by value, never a field-level merge.
    pub fn upsert(
        &self,
        resource: Resource,
    ) -> UpsertOutcome {
        trace!("upsert resource: {}", resource.name);
        match self.by_name.insert(resource.name.clone(), Arc::new(resource)) {
            Some(_) => UpsertOutcome::Replaced,
            None => UpsertOutcome::Inserted,
        }
    }

    /// Remove the named resource. The store is left unchanged when the name
    /// is unknown.
    pub fn delete(
        &self,
        name: &str,
    ) -> Result<Arc<Resource>, StoreError> {
        trace!("delete resource: {name}");
        self.by_name
            .remove(name)
            .map(|(_, resource)| resource)
            .ok_or_else(|| StoreError::UnknownResource { name: name.to_string() })
    }

    pub fn try_get(
        &self,
        name: &str,
    ) -> Option<Arc<Resource>> {
        self.by_name.get(name).map(|entry| entry.value().clone())
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.by_name.contains_key(name)
    }

    /// Point-in-time readable view for iteration. Cheap: clones the `Arc`s,
    /// not the resources.
    pub fn snapshot(&self) -> Vec<Arc<Resource>> {
        self.by_name.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Whether two or more live, non-hidden resources share this resource's
    /// display name (replicas).
    pub fn has_multiple_replicas(
        &self,
        resource: &Resource,
    ) -> bool {
        let mut count = 0;
        for entry in self.by_name.iter() {
            let item = entry.value();
            if item.is_hidden_state() {
                continue;
            }
            if item.display_name.eq_ignore_ascii_case(&resource.display_name) {
                count += 1;
                if count >= 2 {
                    return true;
                }
            }
        }
        false
    }

    /// Display name disambiguated for replicas: `display (name)` when the
    /// display name is shared, the plain display name otherwise.
    pub fn resolved_display_name(
        &self,
        resource: &Resource,
    ) -> String {
        if self.has_multiple_replicas(resource) {
            format!("{} ({})", resource.display_name, resource.name)
        } else {
            resource.display_name.clone()
        }
    }
}
