pub mod inventory;
pub mod summary;
pub mod tree;

pub use summary::{tally, Summary, SummaryCounts};
pub use tree::{IndentGuard, IndentLevel, RenderOptions, TreeRenderer};
