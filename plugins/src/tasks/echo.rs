use async_trait::async_trait;
use serde_json::Value;

use richtask_core::api::{Task, TaskContext, TaskError, TaskOutput};

/// Returns its own invocation arguments as the result.
pub struct EchoData;

#[async_trait]
impl Task for EchoData {
    fn name(&self) -> &str {
        "echo_data"
    }

    async fn run(&self, ctx: &mut TaskContext) -> Result<TaskOutput, TaskError> {
        Ok(TaskOutput::new().result(Value::Object(ctx.params().clone())))
    }
}
