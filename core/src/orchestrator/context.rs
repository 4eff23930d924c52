use std::sync::Arc;

use serde_json::{Map, Value};

use super::task::{error_leaf, Task};
use crate::error::TaskError;
use crate::inventory::Host;
use crate::processor::Processor;
use crate::result::{HostResult, LeafResult, TaskRun};

/// Per-host execution state handed to [`Task::run`].
pub struct TaskContext {
    host: Arc<Host>,
    run: Arc<TaskRun>,
    processor: Arc<dyn Processor>,
    subresults: Vec<LeafResult>,
}

impl TaskContext {
    pub(crate) fn new(host: Arc<Host>, run: Arc<TaskRun>, processor: Arc<dyn Processor>) -> Self {
        Self {
            host,
            run,
            processor,
            subresults: Vec::new(),
        }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn run(&self) -> &Arc<TaskRun> {
        &self.run
    }

    pub fn params(&self) -> &Map<String, Value> {
        self.run.params()
    }

    /// Required string argument.
    pub fn arg_str(&self, key: &str) -> Result<&str, TaskError> {
        match self.params().get(key) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(TaskError::InvalidArgument {
                name: key.to_string(),
                message: format!("expected a string, got {other}"),
            }),
            None => Err(TaskError::MissingArgument(key.to_string())),
        }
    }

    /// Optional boolean argument; accepts JSON booleans and "true"/"false".
    pub fn arg_bool(&self, key: &str, default: bool) -> Result<bool, TaskError> {
        match self.params().get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) => s.parse().map_err(|_| TaskError::InvalidArgument {
                name: key.to_string(),
                message: format!("expected true or false, got '{s}'"),
            }),
            Some(other) => Err(TaskError::InvalidArgument {
                name: key.to_string(),
                message: format!("expected a boolean, got {other}"),
            }),
        }
    }

    /// Run `task` on this context's host as a subtask. Its leaves are
    /// appended after this task's own result, in spawn order.
    pub async fn run_subtask(&mut self, task: &dyn Task, params: Map<String, Value>) -> LeafResult {
        let run = Arc::new(self.run.subtask(task.name(), params));
        self.processor.subtask_instance_started(&run, &self.host);

        let child = TaskContext::new(
            Arc::clone(&self.host),
            Arc::clone(&run),
            Arc::clone(&self.processor),
        );
        let result = execute(task, child).await;

        self.processor
            .subtask_instance_completed(&run, &self.host, &result);
        let top = result.top().clone();
        self.subresults.extend(result.leaves().iter().cloned());
        top
    }
}

/// Run a task body for one host and collect its leaves.
pub(crate) async fn execute(task: &dyn Task, mut ctx: TaskContext) -> HostResult {
    let host_name = ctx.host.name.clone();
    tracing::debug!(task = ctx.run.name(), host = %host_name, "task instance running");

    let top = match task.run(&mut ctx).await {
        Ok(output) => output.into_leaf(&host_name, &ctx.run),
        Err(err) => {
            tracing::debug!(task = ctx.run.name(), host = %host_name, error = %err, "task raised");
            error_leaf(&err, &host_name, &ctx.run)
        }
    };

    let mut result = HostResult::new(host_name, top);
    for leaf in ctx.subresults {
        result.push(leaf);
    }
    result
}
