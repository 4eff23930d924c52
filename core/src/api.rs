//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `richtask_core::api` instead of reaching into internal modules.

pub use crate::config::{
    apply_env_overrides, get_richtask_data_dir, load_default, load_from, AppConfig,
    InventoryConfig, LoggingConfig, RenderConfig, RunnerConfig,
};
pub use crate::console::{Console, ExportFormat, Line, Style, DEFAULT_WIDTH};
pub use crate::error::{
    CliError, ConfigError, FilterError, InventoryError, PlanError, RenderError, ResultError,
    TaskError,
};
pub use crate::inventory::{filter_inventory, load_inventory, FilterParams, Host, Inventory};
pub use crate::orchestrator::{Runner, Task, TaskContext, TaskOutput};
pub use crate::processor::{Processor, Processors};
pub use crate::result::{
    AggregatedResult, HostResult, LeafResult, ResultField, ResultNode, Severity, TaskException,
    TaskRun, TestAssertion, DEFAULT_FIELDS,
};
