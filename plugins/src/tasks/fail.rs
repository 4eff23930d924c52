use async_trait::async_trait;

use richtask_core::api::{Task, TaskContext, TaskError, TaskOutput};

/// Always raises. `message` overrides the error text.
pub struct Fail;

#[async_trait]
impl Task for Fail {
    fn name(&self) -> &str {
        "fail"
    }

    async fn run(&self, ctx: &mut TaskContext) -> Result<TaskOutput, TaskError> {
        let message = match ctx.arg_str("message") {
            Ok(m) => m.to_string(),
            Err(_) => format!("{} failed on purpose", ctx.host().name),
        };
        Err(TaskError::Other(message))
    }
}
