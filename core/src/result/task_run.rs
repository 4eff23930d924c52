use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::Severity;

/// One invocation of a unit of work across a set of hosts.
///
/// The orchestrator hands each host its own instance (see [`TaskRun::for_host`])
/// so per-host timing does not collide; instances and subtasks keep the id of
/// the task that was dispatched at the top level in `root_id`.
#[derive(Debug)]
pub struct TaskRun {
    id: Uuid,
    root_id: Uuid,
    name: String,
    params: Map<String, Value>,
    severity_level: Severity,
    started_at: OnceLock<DateTime<Utc>>,
    finished_at: OnceLock<DateTime<Utc>>,
}

impl TaskRun {
    pub fn new(name: impl Into<String>) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            root_id: id,
            name: name.into(),
            params: Map::new(),
            severity_level: Severity::default(),
            started_at: OnceLock::new(),
            finished_at: OnceLock::new(),
        }
    }

    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    pub fn with_severity(mut self, severity_level: Severity) -> Self {
        self.severity_level = severity_level;
        self
    }

    /// Copy for one host: same identity, fresh timing.
    pub fn for_host(&self) -> Self {
        Self {
            id: self.id,
            root_id: self.root_id,
            name: self.name.clone(),
            params: self.params.clone(),
            severity_level: self.severity_level,
            started_at: OnceLock::new(),
            finished_at: OnceLock::new(),
        }
    }

    /// A nested task spawned from within this one.
    pub fn subtask(&self, name: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            root_id: self.root_id,
            name: name.into(),
            params,
            severity_level: self.severity_level,
            started_at: OnceLock::new(),
            finished_at: OnceLock::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn root_id(&self) -> Uuid {
        self.root_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn severity_level(&self) -> Severity {
        self.severity_level
    }

    /// Stamp the start time. Later calls are ignored.
    pub fn mark_started(&self) {
        self.mark_started_at(Utc::now());
    }

    pub fn mark_started_at(&self, ts: DateTime<Utc>) {
        let _ = self.started_at.set(ts);
    }

    /// Stamp the end time. Later calls are ignored.
    pub fn mark_finished(&self) {
        self.mark_finished_at(Utc::now());
    }

    pub fn mark_finished_at(&self, ts: DateTime<Utc>) {
        let _ = self.finished_at.set(ts);
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at.get().copied()
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at.get().copied()
    }

    /// End minus start; `None` until both stamps exist.
    pub fn run_time(&self) -> Option<Duration> {
        let start = self.started_at.get()?;
        let end = self.finished_at.get()?;
        Some(*end - *start)
    }
}
