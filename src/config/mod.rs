//! Configuration for the resource view engine.
//!
//! Provides layered configuration loading with priority:
//! 1. Default values (hardcoded)
//! 2. Optional TOML config file
//! 3. Environment variables with the `RESVIEW` prefix (highest priority)

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// How the engine treats a resource name that appears more than once in the
/// initial snapshot. Duplicates are a provider contract violation; which
/// recovery is acceptable is a deployment decision, not a hidden default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateNamePolicy {
    /// Fail the subscription with `SubscriptionError::DuplicateSnapshotName`.
    Reject,
    /// Last write wins; each duplicate is logged as a warning.
    Overwrite,
    /// First write wins; later duplicates are dropped with a warning.
    Ignore,
}

impl Default for DuplicateNamePolicy {
    fn default() -> Self {
        DuplicateNamePolicy::Overwrite
    }
}

/// Engine-level tunables for a resource view session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Recovery policy for duplicate names in the initial snapshot
    #[serde(default)]
    pub duplicate_name_policy: DuplicateNamePolicy,

    /// Page size used when a query does not specify a row count
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Cap on the number of highlighted commands surfaced per resource.
    /// Extra highlighted commands remain reachable through command menus.
    #[serde(default = "default_max_highlighted_commands")]
    pub max_highlighted_commands: usize,

    /// Bounded depth of the change-feed channel between provider and
    /// consumption loop
    #[serde(default = "default_change_buffer_capacity")]
    pub change_buffer_capacity: usize,

    /// Startup bias: when set, only these types become visible on first
    /// observation during the snapshot; all other types start hidden.
    #[serde(default)]
    pub preselected_visible_types: Option<Vec<String>>,
}

fn default_page_size() -> usize {
    100
}

fn default_max_highlighted_commands() -> usize {
    2
}

fn default_change_buffer_capacity() -> usize {
    64
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            duplicate_name_policy: DuplicateNamePolicy::default(),
            default_page_size: default_page_size(),
            max_highlighted_commands: default_max_highlighted_commands(),
            change_buffer_capacity: default_change_buffer_capacity(),
            preselected_visible_types: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration with priority:
    /// 1. Optional config file
    /// 2. Environment variables (highest priority)
    ///
    /// # Arguments
    /// * `path` - Optional path to a TOML configuration file
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = Config::builder();

        if let Some(path) = path {
            config = config.add_source(File::with_name(path).required(true));
        }

        config = config.add_source(
            Environment::with_prefix("RESVIEW")
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        config.build()?.try_deserialize().map_err(Error::from)
    }
}
