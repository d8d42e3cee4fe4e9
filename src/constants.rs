/// Resource type tags with dedicated handling (icons, source resolution).
/// Any other string is treated as an open type tag.
pub mod known_resource_types {
    pub const PROJECT: &str = "Project";
    pub const CONTAINER: &str = "Container";
    pub const EXECUTABLE: &str = "Executable";
}

/// Resource states that the engine interprets. Everything else is displayed
/// verbatim and treated as a neutral state.
pub mod known_resource_states {
    pub const RUNNING: &str = "Running";
    pub const STARTING: &str = "Starting";
    pub const STOPPING: &str = "Stopping";
    pub const EXITED: &str = "Exited";
    pub const FINISHED: &str = "Finished";
    pub const FAILED_TO_START: &str = "FailedToStart";

    /// Resources in this state are excluded by the visibility predicate.
    pub const HIDDEN: &str = "Hidden";
}

/// Environment entry carrying a comma-separated list of referenced resource
/// display names, consumed by the graph projector.
pub const RESOURCE_REFERENCES_ENV: &str = "hack_resource_references";

/// Label used when a resource exposes no resolvable endpoint.
pub const NO_ENDPOINTS_LABEL: &str = "No endpoints";

/// Maximum number of endpoints listed in an endpoints tooltip before the
/// remainder collapses into a `+ N` suffix.
pub const MAX_TOOLTIP_ENDPOINTS: usize = 3;
