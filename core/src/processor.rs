//! Lifecycle callbacks the orchestrator fires while a task runs.
//!
//! Order for one task: `task_started`, then per host
//! `task_instance_started` / `task_instance_completed` (with any
//! `subtask_instance_*` pairs in between), then `task_completed`. Callbacks
//! for different hosts interleave arbitrarily.

use std::sync::Arc;

use crate::inventory::Host;
use crate::result::{AggregatedResult, HostResult, TaskRun};

/// Observer of task lifecycle events. Every method defaults to a no-op.
pub trait Processor: Send + Sync {
    fn name(&self) -> &str;

    fn task_started(&self, _task: &TaskRun) {}

    fn task_completed(&self, _task: &TaskRun, _result: &AggregatedResult) {}

    fn task_instance_started(&self, _task: &TaskRun, _host: &Host) {}

    fn task_instance_completed(&self, _task: &TaskRun, _host: &Host, _result: &HostResult) {}

    fn subtask_instance_started(&self, _task: &TaskRun, _host: &Host) {}

    fn subtask_instance_completed(&self, _task: &TaskRun, _host: &Host, _result: &HostResult) {}
}

/// Fans each callback out to the registered processors in registration order.
#[derive(Clone, Default)]
pub struct Processors {
    inner: Vec<Arc<dyn Processor>>,
}

impl Processors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, processor: Arc<dyn Processor>) -> Self {
        self.push(processor);
        self
    }

    pub fn push(&mut self, processor: Arc<dyn Processor>) {
        tracing::debug!(processor = processor.name(), "processor registered");
        self.inner.push(processor);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for Processors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.inner.iter().map(|p| p.name()))
            .finish()
    }
}

impl Processor for Processors {
    fn name(&self) -> &str {
        "processors"
    }

    fn task_started(&self, task: &TaskRun) {
        for p in &self.inner {
            p.task_started(task);
        }
    }

    fn task_completed(&self, task: &TaskRun, result: &AggregatedResult) {
        for p in &self.inner {
            p.task_completed(task, result);
        }
    }

    fn task_instance_started(&self, task: &TaskRun, host: &Host) {
        for p in &self.inner {
            p.task_instance_started(task, host);
        }
    }

    fn task_instance_completed(&self, task: &TaskRun, host: &Host, result: &HostResult) {
        for p in &self.inner {
            p.task_instance_completed(task, host, result);
        }
    }

    fn subtask_instance_started(&self, task: &TaskRun, host: &Host) {
        for p in &self.inner {
            p.subtask_instance_started(task, host);
        }
    }

    fn subtask_instance_completed(&self, task: &TaskRun, host: &Host, result: &HostResult) {
        for p in &self.inner {
            p.subtask_instance_completed(task, host, result);
        }
    }
}
