//! Styled output sink.
//!
//! Text is built from semantically tagged [`Segment`]s. A [`Console`] paints
//! them to a writer (ANSI when colour is enabled) and keeps a record that can
//! later be exported as plain text or HTML.

mod export;
mod highlight;
mod panel;
mod sink;
mod style;
mod table;
mod text;

pub use export::ExportFormat;
pub use highlight::Highlighter;
pub use panel::Panel;
pub use sink::Console;
pub use style::Style;
pub use table::{Column, Table};
pub use text::{Line, Segment};

/// Width used when the terminal size cannot be detected.
pub const DEFAULT_WIDTH: usize = 80;
