//! Core data model for the resource view engine.
//!
//! A [`Resource`] is one monitored unit of a distributed application
//! (process, container, project), identified by a unique `name`. Resources
//! are immutable values: every upsert replaces the whole value, never merges
//! fields.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::SystemTime;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::known_resource_states;

/// One monitored unit of a distributed application, tracked by name.
///
/// `parent_name` is a lookup-only back-reference, never an ownership edge:
/// the referenced resource may or may not currently exist, and chains may
/// contain cycles. Every walk along it must be bounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Stable identity key, unique across all live resources
    pub name: String,
    /// Human-facing name; not unique (replicas share it)
    pub display_name: String,
    /// Open string type tag (see `known_resource_types` for special cases)
    pub resource_type: String,
    /// Current state, e.g. `Running`; `None` while unknown
    pub state: Option<String>,
    pub start_timestamp: Option<SystemTime>,
    /// Back-reference to another resource's `name`; resolved dynamically
    pub parent_name: Option<String>,
    /// Opaque id carried through to graph consumers
    pub uid: String,
    pub commands: Vec<ResourceCommand>,
    pub properties: HashMap<String, String>,
    pub environment: HashMap<String, String>,
    pub urls: Vec<ResourceUrl>,
}

impl Resource {
    /// Resources in the hidden state are excluded by the visibility
    /// predicate but still live in the store.
    pub fn is_hidden_state(&self) -> bool {
        self.state.as_deref() == Some(known_resource_states::HIDDEN)
    }

    /// Case-insensitive substring match against the resource's display
    /// identity (display name, falling back to name).
    pub fn matches_filter(
        &self,
        filter: &str,
    ) -> bool {
        let filter = filter.to_lowercase();
        self.display_name.to_lowercase().contains(&filter) || self.name.to_lowercase().contains(&filter)
    }

    /// Count of commands eligible for highlighted display
    pub fn highlighted_command_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| c.is_highlighted && c.state != CommandState::Hidden)
            .count()
    }
}

/// A command descriptor attached to a resource. Execution happens outside
/// the engine; the engine only carries the metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCommand {
    pub name: String,
    pub display_name: String,
    /// When set, the surface must confirm before executing
    pub confirmation_message: Option<String>,
    pub is_highlighted: bool,
    pub state: CommandState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandState {
    Enabled,
    Disabled,
    Hidden,
}

/// A URL exposed by a resource. Internal URLs are shown only on request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUrl {
    pub name: Option<String>,
    pub url: String,
    pub is_internal: bool,
}

/// Grouping identity for unviewed-error-count aggregation.
/// Distinct from resource `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationKey {
    pub name: String,
    pub instance_id: Option<String>,
}

impl ApplicationKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instance_id: None,
        }
    }

    pub fn with_instance(
        name: impl Into<String>,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instance_id: Some(instance_id.into()),
        }
    }
}

/// One entry of the ordered change feed.
///
/// `Delete` carries the full resource the provider last knew; only the name
/// is consulted when removing.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceChange {
    Upsert(Resource),
    Delete(Resource),
}

impl ResourceChange {
    pub fn name(&self) -> &str {
        match self {
            ResourceChange::Upsert(r) => &r.name,
            ResourceChange::Delete(r) => &r.name,
        }
    }
}

/// Caller-chosen sort order for paged queries. Every key carries a
/// deterministic name tie-break so the overall order is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    State,
    /// Newest first
    StartTime,
    Type,
}

impl SortKey {
    pub fn compare(
        &self,
        a: &Resource,
        b: &Resource,
    ) -> Ordering {
        match self {
            SortKey::Name => compare_names(a, b),
            SortKey::State => a.state.cmp(&b.state).then_with(|| compare_names(a, b)),
            SortKey::StartTime => b
                .start_timestamp
                .cmp(&a.start_timestamp)
                .then_with(|| compare_names(a, b)),
            SortKey::Type => a
                .resource_type
                .to_lowercase()
                .cmp(&b.resource_type.to_lowercase())
                .then_with(|| compare_names(a, b)),
        }
    }
}

/// Case-insensitive name comparison with a case-sensitive fallback so that
/// distinct names never compare equal.
fn compare_names(
    a: &Resource,
    b: &Resource,
) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}
