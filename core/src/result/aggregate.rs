use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::error::ResultError;

use super::{HostResult, TaskRun};

/// One task run fanned out over many hosts.
#[derive(Debug, Clone)]
pub struct AggregatedResult {
    task: Arc<TaskRun>,
    hosts: HashMap<String, HostResult>,
    skipped: BTreeSet<String>,
}

impl AggregatedResult {
    pub fn new(task: Arc<TaskRun>) -> Self {
        Self {
            task,
            hosts: HashMap::new(),
            skipped: BTreeSet::new(),
        }
    }

    pub fn insert(&mut self, result: HostResult) -> Result<(), ResultError> {
        let host = result.host().to_string();
        if self.hosts.contains_key(&host) {
            return Err(ResultError::DuplicateHost(host));
        }
        self.skipped.remove(&host);
        self.hosts.insert(host, result);
        Ok(())
    }

    /// Record a host that was expected to run but produced nothing.
    pub fn mark_skipped(&mut self, host: impl Into<String>) {
        let host = host.into();
        if !self.hosts.contains_key(&host) {
            self.skipped.insert(host);
        }
    }

    pub fn name(&self) -> &str {
        self.task.name()
    }

    pub fn task(&self) -> &Arc<TaskRun> {
        &self.task
    }

    pub fn get(&self, host: &str) -> Option<&HostResult> {
        self.hosts.get(host)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Hosts in ascending name order.
    pub fn iter_hosts(&self) -> impl Iterator<Item = (&str, &HostResult)> {
        let mut hosts: Vec<_> = self.hosts.iter().map(|(k, v)| (k.as_str(), v)).collect();
        hosts.sort_by(|a, b| a.0.cmp(b.0));
        hosts.into_iter()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &str> {
        self.skipped.iter().map(String::as_str)
    }

    pub fn failed(&self) -> bool {
        self.hosts.values().any(HostResult::failed)
    }

    pub fn failed_hosts(&self) -> Vec<&str> {
        self.iter_hosts()
            .filter(|(_, h)| h.failed())
            .map(|(name, _)| name)
            .collect()
    }
}
