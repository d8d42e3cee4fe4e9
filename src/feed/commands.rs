//! Command execution boundary.
//!
//! Confirmation prompting and toast/notification rendering live outside the
//! engine; this layer forwards the call and reports the provider-supplied
//! outcome.

use tracing::error;
use tracing::info;

use super::CommandExecutor;
use super::CommandResult;
use crate::model::Resource;
use crate::model::ResourceCommand;

/// Execute `command` against `resource` through the external executor and
/// return the outcome for the notification surface. Failures carry the
/// provider-supplied message verbatim; there is no retry.
pub async fn run_command(
    executor: &dyn CommandExecutor,
    resource: &Resource,
    command: &ResourceCommand,
) -> CommandResult {
    info!(
        "executing command {} on resource {}",
        command.name, resource.name
    );

    let result = executor
        .execute(&resource.name, &resource.resource_type, command)
        .await;

    match &result {
        CommandResult::Succeeded => {
            info!("command {} on {} succeeded", command.name, resource.name);
        }
        CommandResult::Failed { error_message } => {
            error!(
                "command {} on {} failed: {error_message}",
                command.name, resource.name
            );
        }
    }

    result
}
