use std::process::Stdio;

use async_trait::async_trait;
use serde_json::json;
use tokio::process::Command;

use richtask_core::api::{Task, TaskContext, TaskError, TaskOutput};

/// Runs `command` through `sh -c` on the local machine.
///
/// The host's name and hostname are exported as `RICHTASK_HOST` and
/// `RICHTASK_HOSTNAME`. A non-zero exit marks the result failed; `changed`
/// (default false) is reported as given.
pub struct CommandTask;

#[async_trait]
impl Task for CommandTask {
    fn name(&self) -> &str {
        "command"
    }

    async fn run(&self, ctx: &mut TaskContext) -> Result<TaskOutput, TaskError> {
        let command = ctx.arg_str("command")?.to_string();
        let changed = ctx.arg_bool("changed", false)?;
        let host = ctx.host();

        let output = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .env("RICHTASK_HOST", &host.name)
            .env(
                "RICHTASK_HOSTNAME",
                host.hostname.as_deref().unwrap_or(&host.name),
            )
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        let rc = output.status.code();
        tracing::debug!(host = %host.name, command = %command, ?rc, "command finished");

        Ok(TaskOutput::new()
            .changed(changed)
            .failed(!output.status.success())
            .stdout(String::from_utf8_lossy(&output.stdout).into_owned())
            .stderr(String::from_utf8_lossy(&output.stderr).into_owned())
            .result(json!({ "rc": rc })))
    }
}
