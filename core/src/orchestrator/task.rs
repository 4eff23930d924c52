use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::TaskContext;
use crate::error::TaskError;
use crate::result::{LeafResult, Severity, TaskException, TaskRun, TestAssertion};

/// A unit of work executed once per host.
#[async_trait]
pub trait Task: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, ctx: &mut TaskContext) -> Result<TaskOutput, TaskError>;
}

/// What a task body reports back for its host.
#[derive(Debug, Clone, Default)]
pub struct TaskOutput {
    pub changed: bool,
    pub failed: bool,
    /// Overrides the task's severity level for this leaf.
    pub severity: Option<Severity>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub result: Option<Value>,
    pub diff: Option<String>,
    pub tests: Vec<TestAssertion>,
}

impl TaskOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changed(mut self, changed: bool) -> Self {
        self.changed = changed;
        self
    }

    pub fn failed(mut self, failed: bool) -> Self {
        self.failed = failed;
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = Some(stdout.into());
        self
    }

    pub fn stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = Some(stderr.into());
        self
    }

    pub fn result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    pub fn diff(mut self, diff: impl Into<String>) -> Self {
        self.diff = Some(diff.into());
        self
    }

    pub fn test(mut self, name: impl Into<String>, passed: bool, message: Option<String>) -> Self {
        self.tests.push(TestAssertion {
            name: name.into(),
            passed,
            message,
        });
        self
    }

    pub(crate) fn into_leaf(self, host: &str, run: &Arc<TaskRun>) -> LeafResult {
        let mut leaf = LeafResult::new(run.name(), host)
            .changed(self.changed)
            .failed(self.failed)
            .severity(self.severity.unwrap_or(run.severity_level()))
            .task(Arc::clone(run));
        leaf.stdout = self.stdout;
        leaf.stderr = self.stderr;
        leaf.result = self.result;
        leaf.diff = self.diff;
        leaf.tests = self.tests;
        leaf
    }
}

/// Failed leaf standing in for a task body that returned an error. The
/// message doubles as the result so default field selections show it.
pub(crate) fn error_leaf(err: &TaskError, host: &str, run: &Arc<TaskRun>) -> LeafResult {
    let message = err.to_string();
    LeafResult::new(run.name(), host)
        .failed(true)
        .severity(Severity::Error)
        .result(Value::String(message.clone()))
        .exception(TaskException::new(err.kind(), message))
        .task(Arc::clone(run))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_leaf_inherits_task_severity() {
        let run = Arc::new(TaskRun::new("cfg").with_severity(Severity::Warning));
        let leaf = TaskOutput::new()
            .changed(true)
            .result(json!({"lines": 3}))
            .into_leaf("r1", &run);
        assert_eq!(leaf.name, "cfg");
        assert_eq!(leaf.host, "r1");
        assert!(leaf.changed);
        assert_eq!(leaf.severity, Severity::Warning);
        assert!(Arc::ptr_eq(leaf.task.as_ref().unwrap(), &run));

        let leaf = TaskOutput::new()
            .severity(Severity::Debug)
            .into_leaf("r1", &run);
        assert_eq!(leaf.severity, Severity::Debug);
    }

    #[test]
    fn test_error_leaf() {
        let run = Arc::new(TaskRun::new("cfg"));
        let leaf = error_leaf(&TaskError::MissingArgument("cmd".into()), "r2", &run);
        assert!(leaf.failed);
        assert_eq!(leaf.severity, Severity::Error);
        assert_eq!(leaf.result, Some(json!("missing argument 'cmd'")));
        let exc = leaf.exception.unwrap();
        assert_eq!(exc.kind, "MissingArgument");
        assert_eq!(exc.message, "missing argument 'cmd'");
    }
}
