use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use super::export::{to_html, to_text};
use super::{ExportFormat, Line, DEFAULT_WIDTH};

/// Output sink: paints lines to a writer and records them for export.
pub struct Console {
    width: usize,
    color: bool,
    out: Option<Box<dyn Write + Send>>,
    record: bool,
    recorded: Vec<Line>,
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("width", &self.width)
            .field("color", &self.color)
            .field("record", &self.record)
            .field("recorded", &self.recorded.len())
            .finish()
    }
}

impl Console {
    /// Console on stdout. `width == 0` detects the terminal width.
    pub fn stdout(width: usize, record: bool) -> Self {
        Self {
            width: resolve_width(width),
            color: atty::is(atty::Stream::Stdout),
            out: Some(Box::new(io::stdout())),
            record,
            recorded: Vec::new(),
        }
    }

    pub fn with_writer(writer: Box<dyn Write + Send>, width: usize, color: bool) -> Self {
        Self {
            width: resolve_width(width),
            color,
            out: Some(writer),
            record: true,
            recorded: Vec::new(),
        }
    }

    /// Record-only console, nothing is painted.
    pub fn buffer(width: usize) -> Self {
        Self {
            width: resolve_width(width),
            color: false,
            out: None,
            record: true,
            recorded: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn print(&mut self, line: Line) -> io::Result<()> {
        if let Some(out) = self.out.as_mut() {
            write_line(out.as_mut(), &line, self.color)?;
        }
        if self.record {
            self.recorded.push(line);
        }
        Ok(())
    }

    pub fn print_lines(&mut self, lines: impl IntoIterator<Item = Line>) -> io::Result<()> {
        for line in lines {
            self.print(line)?;
        }
        if let Some(out) = self.out.as_mut() {
            out.flush()?;
        }
        Ok(())
    }

    pub fn blank(&mut self) -> io::Result<()> {
        self.print(Line::new())
    }

    pub fn recorded(&self) -> &[Line] {
        &self.recorded
    }

    pub fn export_text(&self) -> String {
        to_text(&self.recorded)
    }

    pub fn export_html(&self) -> String {
        to_html(&self.recorded)
    }

    pub fn save(&self, path: impl AsRef<Path>, format: ExportFormat) -> io::Result<()> {
        let body = match format {
            ExportFormat::Text => self.export_text(),
            ExportFormat::Html => self.export_html(),
        };
        std::fs::write(path, body)
    }
}

fn write_line(out: &mut dyn Write, line: &Line, color: bool) -> io::Result<()> {
    for seg in line.segments() {
        if color {
            write!(out, "{}", seg.style.content_style().apply(seg.text.as_str()))?;
        } else {
            out.write_all(seg.text.as_bytes())?;
        }
    }
    out.write_all(b"\n")
}

fn resolve_width(width: usize) -> usize {
    if width > 0 {
        return width;
    }
    match crossterm::terminal::size() {
        Ok((cols, _)) if cols > 0 => cols as usize,
        _ => DEFAULT_WIDTH,
    }
}
