//! Resource View Engine Error Hierarchy
//!
//! Defines error types for the in-memory resource view engine, categorized by
//! the component that raises them: the store, the change-feed subscription and
//! configuration loading.

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Store-level contract violations (unknown names, duplicate keys)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Change-feed subscription lifecycle failures
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    /// Engine configuration validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unrecoverable failures requiring session teardown
    #[error("Fatal error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A `Delete` referenced a name not currently present in the store.
    /// Non-fatal: callers log it and leave the store unchanged.
    #[error("Unknown resource: {name}")]
    UnknownResource { name: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    /// The initial snapshot contained the same resource name twice.
    /// Raised only under `DuplicateNamePolicy::Reject`.
    #[error("Duplicate resource name in initial snapshot: {name}")]
    DuplicateSnapshotName { name: String },

    /// The provider refused or failed to establish the subscription
    #[error("Subscribe failed: {0}")]
    SubscribeFailed(String),
}
