use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ResultField, Severity, TaskRun};

/// Error captured from a task body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskException {
    pub kind: String,
    pub message: String,
}

impl TaskException {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Named pass/fail check reported by a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestAssertion {
    pub name: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Outcome of one function for one host.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LeafResult {
    pub name: String,
    pub host: String,
    pub changed: bool,
    pub failed: bool,
    pub severity: Severity,
    pub stdout: Option<String>,
    pub result: Option<Value>,
    pub stderr: Option<String>,
    pub diff: Option<String>,
    pub exception: Option<TaskException>,
    pub tests: Vec<TestAssertion>,
    /// Run that produced this leaf, used for timing and parameter display.
    #[serde(skip)]
    pub task: Option<Arc<TaskRun>>,
}

impl LeafResult {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            ..Self::default()
        }
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
        self.severity = severity;
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

    pub fn exception(mut self, exception: TaskException) -> Self {
        self.exception = Some(exception);
        self
    }

    pub fn test(mut self, test: TestAssertion) -> Self {
        self.tests.push(test);
        self
    }

    pub fn task(mut self, task: Arc<TaskRun>) -> Self {
        self.task = Some(task);
        self
    }

    pub fn is_ok(&self) -> bool {
        !self.changed && !self.failed
    }

    /// True when the field is present and carries something to show.
    pub fn has_field(&self, field: ResultField) -> bool {
        match field {
            ResultField::Stdout => self.stdout.as_deref().is_some_and(|s| !s.is_empty()),
            ResultField::Stderr => self.stderr.as_deref().is_some_and(|s| !s.is_empty()),
            ResultField::Diff => self.diff.as_deref().is_some_and(|s| !s.is_empty()),
            ResultField::Result => self.result.as_ref().is_some_and(|v| !is_empty_value(v)),
            ResultField::Exception => self.exception.is_some(),
            ResultField::Tests => !self.tests.is_empty(),
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_has_field_ignores_empty_payloads() {
        let leaf = LeafResult::new("t", "r1")
            .stdout("")
            .result(json!({}))
            .diff("+ line");
        assert!(!leaf.has_field(ResultField::Stdout));
        assert!(!leaf.has_field(ResultField::Result));
        assert!(leaf.has_field(ResultField::Diff));
        assert!(!leaf.has_field(ResultField::Tests));
    }

    #[test]
    fn test_scalars_are_values() {
        assert!(LeafResult::new("t", "r1")
            .result(json!(0))
            .has_field(ResultField::Result));
        assert!(LeafResult::new("t", "r1")
            .result(json!(false))
            .has_field(ResultField::Result));
        assert!(!LeafResult::new("t", "r1")
            .result(json!(null))
            .has_field(ResultField::Result));
    }
}
