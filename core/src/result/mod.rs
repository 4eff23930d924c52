//! Result tree produced by a task run.
//!
//! ```text
//! AggregatedResult            one task fanned out over hosts
//!   └─ host → HostResult      non-empty, ordered: [top-level, subtask, ...]
//!                └─ LeafResult
//! ```
//!
//! [`ResultNode`] is the borrowed view renderers match on.

mod aggregate;
mod field;
mod host;
mod leaf;
mod severity;
mod task_run;

pub use aggregate::AggregatedResult;
pub use field::{ResultField, DEFAULT_FIELDS};
pub use host::HostResult;
pub use leaf::{LeafResult, TaskException, TestAssertion};
pub use severity::Severity;
pub use task_run::TaskRun;

/// Any of the three result shapes.
#[derive(Debug, Clone, Copy)]
pub enum ResultNode<'a> {
    Aggregate(&'a AggregatedResult),
    Host(&'a HostResult),
    Leaf(&'a LeafResult),
}
