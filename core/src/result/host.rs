use crate::error::ResultError;

use super::{LeafResult, Severity};

/// One host's ordered leaves: the top-level result first, then subtask
/// results in the order they were spawned. Never empty.
#[derive(Debug, Clone)]
pub struct HostResult {
    host: String,
    leaves: Vec<LeafResult>,
}

impl HostResult {
    pub fn new(host: impl Into<String>, top_level: LeafResult) -> Self {
        Self {
            host: host.into(),
            leaves: vec![top_level],
        }
    }

    pub fn from_leaves(
        host: impl Into<String>,
        leaves: Vec<LeafResult>,
    ) -> Result<Self, ResultError> {
        let host = host.into();
        if leaves.is_empty() {
            return Err(ResultError::EmptyHostResult(host));
        }
        Ok(Self { host, leaves })
    }

    pub fn push(&mut self, leaf: LeafResult) {
        self.leaves.push(leaf);
    }

    pub fn extend(&mut self, other: HostResult) {
        self.leaves.extend(other.leaves);
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The host's top-level result.
    pub fn top(&self) -> &LeafResult {
        &self.leaves[0]
    }

    pub fn subtasks(&self) -> &[LeafResult] {
        &self.leaves[1..]
    }

    pub fn leaves(&self) -> &[LeafResult] {
        &self.leaves
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn changed(&self) -> bool {
        self.leaves.iter().any(|l| l.changed)
    }

    pub fn failed(&self) -> bool {
        self.leaves.iter().any(|l| l.failed)
    }

    pub fn max_severity(&self) -> Severity {
        self.leaves
            .iter()
            .map(|l| l.severity)
            .max()
            .unwrap_or_default()
    }
}
