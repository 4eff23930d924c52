#[allow(clippy::module_inception)]
pub mod error;
pub mod inventory;
pub mod render;
pub mod task;

pub use error::{CliError, ConfigError};
pub use inventory::{FilterError, InventoryError};
pub use render::{RenderError, ResultError};
pub use task::{PlanError, TaskError};
