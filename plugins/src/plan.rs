//! Batch plans: an ordered list of built-in tasks read from YAML.
//!
//! ```yaml
//! tasks:
//!   - name: uptime
//!     module: command
//!     args: { command: uptime }
//!   - module: echo_data
//!     args: { site: ams }
//!     severity: debug
//! ```
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use richtask_core::api::{PlanError, Severity, Task, TaskRun};

use crate::factory::build_task;

#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub tasks: Vec<PlanStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanStep {
    /// Display name; defaults to the module name.
    #[serde(default)]
    pub name: Option<String>,
    pub module: String,
    #[serde(default)]
    pub args: Map<String, Value>,
    #[serde(default)]
    pub severity: Option<Severity>,
    /// Also run on hosts that failed an earlier step.
    #[serde(default)]
    pub on_failed: bool,
}

impl Plan {
    /// Parse and validate: at least one step, every module known.
    pub fn parse(content: &str, source: &str) -> Result<Self, PlanError> {
        let plan: Plan = serde_yaml::from_str(content).map_err(|source_err| PlanError::Parse {
            path: source.to_string(),
            source: source_err,
        })?;
        if plan.tasks.is_empty() {
            return Err(PlanError::Empty);
        }
        for step in &plan.tasks {
            build_task(&step.module)?;
        }
        Ok(plan)
    }

    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let shown = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| PlanError::Read {
            path: shown.clone(),
            source,
        })?;
        Self::parse(&content, &shown)
    }
}

impl PlanStep {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.module)
    }

    pub fn build(&self) -> Result<(Arc<dyn Task>, TaskRun), PlanError> {
        let task = build_task(&self.module)?;
        let mut run = TaskRun::new(self.name()).with_params(self.args.clone());
        if let Some(severity) = self.severity {
            run = run.with_severity(severity);
        }
        Ok((task, run))
    }
}

/// Parse `k=v,k2=v2` task arguments. A comma not followed by `key=` is kept
/// as part of the previous value. `true`, `false` and integers are typed.
pub fn parse_args(raw: &str) -> Result<Map<String, Value>, PlanError> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for part in raw.split(',') {
        match part.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() && !key.contains(' ') => {
                pairs.push((key.trim().to_string(), value.to_string()));
            }
            _ => match pairs.last_mut() {
                Some((_, value)) => {
                    value.push(',');
                    value.push_str(part);
                }
                None if part.trim().is_empty() => {}
                None => return Err(PlanError::InvalidArgument(part.to_string())),
            },
        }
    }

    Ok(pairs
        .into_iter()
        .map(|(key, value)| (key, typed(value)))
        .collect())
}

fn typed(value: String) -> Value {
    match value.as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        s => match s.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(value),
        },
    }
}
