//! Minimal task orchestrator: runs a [`Task`] against every host of an
//! inventory and reports lifecycle events to a [`Processor`](crate::processor::Processor).

mod context;
mod runner;
mod task;

pub use context::TaskContext;
pub use runner::Runner;
pub use task::{Task, TaskOutput};
