use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::Style;

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: Style,
}

impl Segment {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Terminal columns, with wide (CJK, emoji) characters counting two.
    pub fn width(&self) -> usize {
        UnicodeWidthStr::width(self.text.as_str())
    }
}

fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// One output line. Segments never contain a newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    segments: Vec<Segment>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, Style::Plain)
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        let mut line = Self::new();
        line.push(text, style);
        line
    }

    pub fn push(&mut self, text: impl Into<String>, style: Style) -> &mut Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        match self.segments.last_mut() {
            Some(last) if last.style == style => last.text.push_str(&text),
            _ => self.segments.push(Segment::new(text, style)),
        }
        self
    }

    pub fn append(&mut self, other: Line) -> &mut Self {
        for seg in other.segments {
            self.push(seg.text, seg.style);
        }
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn width(&self) -> usize {
        self.segments.iter().map(Segment::width).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Right-pad with spaces up to `width`.
    pub fn pad_to(mut self, width: usize) -> Self {
        let current = self.width();
        if current < width {
            self.push(" ".repeat(width - current), Style::Plain);
        }
        self
    }

    /// Cut to at most `width` columns, marking the cut with an ellipsis.
    pub fn truncate(&self, width: usize) -> Self {
        if self.width() <= width {
            return self.clone();
        }
        if width == 0 {
            return Self::new();
        }
        let mut out = self.take_columns(width - 1);
        out.push("…", Style::Plain);
        out
    }

    /// Hard-wrap into lines of at most `width` columns. A wide character
    /// never straddles two lines.
    pub fn wrap(&self, width: usize) -> Vec<Line> {
        if width == 0 || self.width() <= width {
            return vec![self.clone()];
        }
        let mut lines = Vec::new();
        let mut current = Line::new();
        let mut used = 0;
        for seg in &self.segments {
            let mut buf = String::new();
            for ch in seg.text.chars() {
                let w = char_width(ch);
                if used > 0 && used + w > width {
                    current.push(std::mem::take(&mut buf), seg.style);
                    lines.push(std::mem::take(&mut current));
                    used = 0;
                }
                buf.push(ch);
                used += w;
            }
            current.push(buf, seg.style);
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn take_columns(&self, n: usize) -> Self {
        let mut out = Line::new();
        let mut left = n;
        'segments: for seg in &self.segments {
            let mut part = String::new();
            for ch in seg.text.chars() {
                let w = char_width(ch);
                if w > left {
                    out.push(part, seg.style);
                    break 'segments;
                }
                left -= w;
                part.push(ch);
            }
            out.push(part, seg.style);
        }
        out
    }

    /// Split styled segments at newlines into separate lines.
    pub fn split_segments(segments: Vec<Segment>) -> Vec<Line> {
        let mut lines = vec![Line::new()];
        for seg in segments {
            let mut parts = seg.text.split('\n');
            if let Some(first) = parts.next() {
                if let Some(current) = lines.last_mut() {
                    current.push(first, seg.style);
                }
            }
            for part in parts {
                let mut line = Line::new();
                line.push(part, seg.style);
                lines.push(line);
            }
        }
        lines
    }
}

impl From<&str> for Line {
    fn from(value: &str) -> Self {
        Self::plain(value)
    }
}

impl From<String> for Line {
    fn from(value: String) -> Self {
        Self::plain(value)
    }
}
