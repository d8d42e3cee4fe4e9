//! Projects the currently visible resource set into lightweight DTOs for an
//! external graph renderer. The projection is pull-based: consumers call it
//! when the graph surface is active, the engine never pushes drawing data.

use std::sync::Arc;

use serde::Serialize;

use super::VisibilityFilter;
use crate::constants::known_resource_states;
use crate::constants::known_resource_types;
use crate::constants::RESOURCE_REFERENCES_ENV;
use crate::model::displayed_endpoints;
use crate::model::resolved_endpoint_text;
use crate::model::Resource;
use crate::model::SortKey;
use crate::store::ResourceStore;

// SVG path data for the graph node icons.
const EXECUTABLE_ICON_PATH: &str = "M9.405 2.897a7.754 7.754 0 0 1 5.19 0l.43 1.807a6.251 6.251 0 0 0 1.664.962l1.582-.597a7.803 7.803 0 0 1 2.595 4.495l-1.152 1.21a6.255 6.255 0 0 1 0 1.923l1.152 1.21a7.803 7.803 0 0 1-2.595 4.495l-1.582-.597a6.251 6.251 0 0 1-1.665.962l-.43 1.807a7.754 7.754 0 0 1-5.189 0l-.43-1.807a6.251 6.251 0 0 1-1.664-.962l-1.582.597a7.803 7.803 0 0 1-2.595-4.495l1.152-1.21a6.255 6.255 0 0 1 0-1.923l-1.152-1.21a7.803 7.803 0 0 1 2.595-4.495l1.582.597a6.251 6.251 0 0 1 1.665-.962l.43-1.807Z";
const PROJECT_ICON_PATH: &str = "M12 2c5.523 0 10 4.477 10 10s-4.477 10-10 10S2 17.523 2 12 6.477 2 12 2Zm2.207 6.293a1 1 0 0 0-1.414 0l-3 3a1 1 0 0 0 0 1.414l3 3a1 1 0 0 0 1.414-1.414L11.914 12l2.293-2.293a1 1 0 0 0 0-1.414Z";
const CONTAINER_ICON_PATH: &str = "M4 6.75A2.75 2.75 0 0 1 6.75 4h10.5A2.75 2.75 0 0 1 20 6.75v10.5A2.75 2.75 0 0 1 17.25 20H6.75A2.75 2.75 0 0 1 4 17.25V6.75Z";
const DATABASE_ICON_PATH: &str = "M12 2c4.418 0 8 1.567 8 3.5v13c0 1.933-3.582 3.5-8 3.5s-8-1.567-8-3.5v-13C4 3.567 7.582 2 12 2Zm6 9.58c-1.454.87-3.614 1.42-6 1.42s-4.546-.55-6-1.42v6.92c0 .828 2.686 1.5 6 1.5s6-.672 6-1.5v-6.92Z";

// Deterministic node color palette, keyed by a stable hash of the resolved
// display name so a resource keeps its color across projections.
const COLOR_PALETTE: [&str; 12] = [
    "#17B8BE", "#F8DCA1", "#B789C7", "#4DC19C", "#DD8452", "#5D69B1", "#E39C37", "#99C941",
    "#DA60CA", "#525DF4", "#BD35D1", "#7F84E8",
];

/// Icon descriptor handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconDto {
    pub path: String,
    pub color: String,
    pub tooltip: Option<String>,
}

/// One graph node per visible resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceGraphDto {
    pub name: String,
    pub resource_type: String,
    pub display_name: String,
    pub uid: String,
    pub resource_icon: IconDto,
    pub state_icon: IconDto,
    pub referenced_names: Vec<String>,
    pub endpoint_url: Option<String>,
    pub endpoint_text: String,
}

/// Project the filtered resource set, ordered by (type, name), into graph
/// DTOs.
pub fn project_graph(
    store: &ResourceStore,
    visibility: &VisibilityFilter,
) -> Vec<ResourceGraphDto> {
    let mut active: Vec<Arc<Resource>> = store
        .snapshot()
        .into_iter()
        .filter(|r| visibility.predicate(r))
        .collect();
    active.sort_by(|a, b| SortKey::Type.compare(a, b));

    active.iter().map(|r| map_dto(r, &active, store)).collect()
}

fn map_dto(
    resource: &Resource,
    active: &[Arc<Resource>],
    store: &ResourceStore,
) -> ResourceGraphDto {
    let referenced_names: Vec<String> = resource
        .environment
        .get(RESOURCE_REFERENCES_ENV)
        .map(|value| value.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    // Resolve declared references against other visible resources' display
    // names, case-insensitively, into canonical names.
    let mut resolved_names = Vec::new();
    for name in &referenced_names {
        for target in active.iter().filter(|t| t.display_name.eq_ignore_ascii_case(name)) {
            resolved_names.push(target.name.clone());
        }
    }

    let endpoint = displayed_endpoints(resource, false).into_iter().next();
    let endpoint_text = resolved_endpoint_text(endpoint.as_ref());
    let display_name = store.resolved_display_name(resource);
    let color = color_for_key(&display_name);

    let state_icon = state_icon(resource);

    ResourceGraphDto {
        name: resource.name.clone(),
        resource_type: resource.resource_type.clone(),
        display_name,
        uid: resource.uid.clone(),
        resource_icon: IconDto {
            path: type_icon_path(&resource.resource_type).to_string(),
            color: color.to_string(),
            tooltip: Some(resource.resource_type.clone()),
        },
        state_icon,
        referenced_names: resolved_names,
        endpoint_url: endpoint.and_then(|e| e.url),
        endpoint_text,
    }
}

/// Exact match for the well-known types; any type naming a database gets the
/// database icon; everything else reads as an executable.
fn type_icon_path(resource_type: &str) -> &'static str {
    match resource_type {
        known_resource_types::EXECUTABLE => EXECUTABLE_ICON_PATH,
        known_resource_types::PROJECT => PROJECT_ICON_PATH,
        known_resource_types::CONTAINER => CONTAINER_ICON_PATH,
        t if t.to_lowercase().contains("database") => DATABASE_ICON_PATH,
        _ => EXECUTABLE_ICON_PATH,
    }
}

fn state_icon(resource: &Resource) -> IconDto {
    let state = resource.state.as_deref().unwrap_or("");
    let (path, color) = match state {
        known_resource_states::RUNNING => ("M12 1.999c5.524 0 10.002 4.478 10.002 10.002 0 5.523-4.478 10.001-10.002 10.001-5.524 0-10.002-4.478-10.002-10.001C1.998 6.477 6.476 1.999 12 1.999Zm-1.998 12.59-2.294-2.293a1 1 0 0 0-1.414 1.415l3 3a1 1 0 0 0 1.415 0l6-6.001a1 1 0 1 0-1.415-1.414l-5.292 5.294Z", "#0E700E"),
        known_resource_states::FAILED_TO_START => ("M12 2c5.523 0 10 4.477 10 10s-4.477 10-10 10S2 17.523 2 12 6.477 2 12 2Zm3.53 6.47a.75.75 0 0 0-1.06 0L12 10.94 9.53 8.47a.75.75 0 0 0-1.06 1.06L10.94 12l-2.47 2.47a.75.75 0 1 0 1.06 1.06L12 13.06l2.47 2.47a.75.75 0 1 0 1.06-1.06L13.06 12l2.47-2.47a.75.75 0 0 0 0-1.06Z", "#B10E1C"),
        known_resource_states::STARTING | known_resource_states::STOPPING => ("M12 2a1 1 0 0 1 1 1v2a1 1 0 1 1-2 0V3a1 1 0 0 1 1-1Zm0 15a1 1 0 0 1 1 1v3a1 1 0 1 1-2 0v-3a1 1 0 0 1 1-1Z", "#D67F3C"),
        known_resource_states::EXITED | known_resource_states::FINISHED => ("M12 2c5.523 0 10 4.477 10 10s-4.477 10-10 10S2 17.523 2 12 6.477 2 12 2Zm0 2a8 8 0 1 0 0 16 8 8 0 0 0 0-16Z", "#616161"),
        _ => ("M12 8.5a3.5 3.5 0 1 1 0 7 3.5 3.5 0 0 1 0-7Z", "#757575"),
    };

    IconDto {
        path: path.to_string(),
        color: color.to_string(),
        tooltip: resource.state.clone(),
    }
}

/// Stable FNV-1a hash into the palette: the same key always gets the same
/// color within and across projections.
fn color_for_key(key: &str) -> &'static str {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in key.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    COLOR_PALETTE[(hash % COLOR_PALETTE.len() as u64) as usize]
}
