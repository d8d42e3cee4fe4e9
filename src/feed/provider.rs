//! External collaborator seams: the resource provider feeding the engine,
//! the error-log store and the command executor. The engine never performs
//! network I/O itself; these traits are its only windows to the outside.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::model::ApplicationKey;
use crate::model::Resource;
use crate::model::ResourceChange;
use crate::model::ResourceCommand;
use crate::Result;

/// Source of the resource snapshot and the ordered change feed.
///
/// The returned channel must deliver batches strictly in the order the
/// provider produced them; the engine applies them sequentially and never
/// reorders across the boundary. `buffer_capacity` is the engine-configured
/// depth the change channel must be bounded to.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    async fn subscribe(
        &self,
        buffer_capacity: usize,
        cancellation: CancellationToken,
    ) -> Result<(Vec<Resource>, mpsc::Receiver<Vec<ResourceChange>>)>;
}

/// External log store consulted for per-application unviewed error counts.
#[cfg_attr(test, mockall::automock)]
pub trait ErrorLogProvider: Send + Sync {
    fn unviewed_error_counts(&self) -> HashMap<ApplicationKey, u64>;

    /// Register for new-log signals. Each unit received means "counts may
    /// have changed, recompute".
    fn subscribe_new_logs(&self) -> mpsc::UnboundedReceiver<()>;
}

/// Outcome of a command execution, as reported by the external executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Succeeded,
    Failed { error_message: String },
}

/// External command transport. The engine only originates the call and
/// forwards the outcome; it never retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(
        &self,
        resource_name: &str,
        resource_type: &str,
        command: &ResourceCommand,
    ) -> CommandResult;
}
