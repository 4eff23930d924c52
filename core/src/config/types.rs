use serde::{Deserialize, Serialize};

use crate::result::{ResultField, Severity, DEFAULT_FIELDS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub inventory: InventoryConfig,

    #[serde(default)]
    pub runner: RunnerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, also log to a per-process file under `directory`.
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "warn" or "richtask_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Directory for log files. Falls back to `~/.richtask/logs`.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// Knobs for the result renderer, progress bars and summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Output width in columns. 0 detects the terminal width.
    #[serde(default)]
    pub width: usize,

    /// Leaves below this severity are not rendered.
    #[serde(default)]
    pub severity_threshold: Severity,

    /// Append the run time of each task to its leaf title.
    #[serde(default = "default_true")]
    pub timing: bool,

    #[serde(default = "default_true")]
    pub progress_bar: bool,

    /// List hosts that were expected but produced no result.
    #[serde(default)]
    pub show_skipped: bool,

    /// Show the task invocation arguments under each leaf.
    #[serde(default)]
    pub display_params: bool,

    #[serde(default = "default_fields")]
    pub fields: Vec<ResultField>,

    #[serde(default = "default_true")]
    pub attrib_highlight: bool,

    /// Emit ANSI styling when the sink is a terminal.
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

fn default_fields() -> Vec<ResultField> {
    DEFAULT_FIELDS.to_vec()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 0,
            severity_threshold: Severity::default(),
            timing: true,
            progress_bar: true,
            show_skipped: false,
            display_params: false,
            fields: default_fields(),
            attrib_highlight: true,
            color: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    #[serde(default = "default_hosts_file")]
    pub hosts_file: String,

    /// Host record whose fields fill in whatever a host leaves unset.
    #[serde(default)]
    pub defaults_file: Option<String>,
}

fn default_hosts_file() -> String {
    "hosts.yaml".to_string()
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            hosts_file: default_hosts_file(),
            defaults_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Maximum number of hosts a task runs against at once.
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,
}

fn default_num_workers() -> usize {
    num_cpus::get().max(1)
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            num_workers: default_num_workers(),
        }
    }
}
