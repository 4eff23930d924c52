pub mod progress;
pub mod rich_results;

pub use progress::ProgressTracker;
pub use rich_results::{OutputState, RichResults};
