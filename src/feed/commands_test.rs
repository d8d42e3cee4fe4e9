use tracing_test::traced_test;

use super::*;
use crate::model::CommandState;
use crate::model::ResourceCommand;
use crate::test_utils::resource;

fn restart_command() -> ResourceCommand {
    ResourceCommand {
        name: "resource-restart".into(),
        display_name: "Restart".into(),
        confirmation_message: None,
        is_highlighted: true,
        state: CommandState::Enabled,
    }
}

#[tokio::test]
#[traced_test]
async fn successful_execution_is_reported_as_is() {
    let mut executor = MockCommandExecutor::new();
    executor
        .expect_execute()
        .withf(|name, resource_type, command| {
            name == "web" && resource_type == "Project" && command.name == "resource-restart"
        })
        .return_const(CommandResult::Succeeded);

    let web = resource("web").resource_type("Project").build();
    let result = run_command(&executor, &web, &restart_command()).await;

    assert_eq!(result, CommandResult::Succeeded);
}

#[tokio::test]
#[traced_test]
async fn failure_message_is_forwarded_verbatim() {
    let mut executor = MockCommandExecutor::new();
    executor.expect_execute().return_const(CommandResult::Failed {
        error_message: "container runtime unavailable".into(),
    });

    let cache = resource("cache").build();
    let result = run_command(&executor, &cache, &restart_command()).await;

    assert_eq!(
        result,
        CommandResult::Failed {
            error_message: "container runtime unavailable".into(),
        }
    );
}
