use std::sync::Arc;

use richtask_core::api::{PlanError, Processors, RenderConfig, Task};

use crate::processors::{ProgressTracker, RichResults};
use crate::tasks::{CommandTask, EchoData, Fail};

/// Names accepted by [`build_task`].
pub const MODULES: &[&str] = &["echo_data", "command", "fail"];

pub fn build_task(module: &str) -> Result<Arc<dyn Task>, PlanError> {
    match module {
        "echo_data" => Ok(Arc::new(EchoData)),
        "command" => Ok(Arc::new(CommandTask)),
        "fail" => Ok(Arc::new(Fail)),
        other => Err(PlanError::UnknownModule(other.to_string())),
    }
}

/// Result printer on stdout plus, when enabled, progress bars. The tracker
/// is registered first so its bar is finished before results print.
pub fn build_processors(cfg: &RenderConfig) -> (Arc<RichResults>, Processors) {
    let rich = Arc::new(RichResults::new(cfg.clone()));
    let mut processors = Processors::new();
    if cfg.progress_bar {
        processors.push(Arc::new(ProgressTracker::new(true)));
    }
    processors.push(rich.clone());
    (rich, processors)
}
