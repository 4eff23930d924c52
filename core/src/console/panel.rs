use super::{Line, Style};

/// Rounded box with a left-aligned title.
#[derive(Debug, Clone)]
pub struct Panel {
    title: Line,
    body: Vec<Line>,
}

impl Panel {
    pub fn new(title: Line, body: Vec<Line>) -> Self {
        Self { title, body }
    }

    /// Render at `width` columns total, shifted right by `pad_left`.
    pub fn render(&self, width: usize, pad_left: usize) -> Vec<Line> {
        let outer = width.saturating_sub(pad_left).max(6);
        let inner = outer - 4;
        let pad = " ".repeat(pad_left);

        let mut lines = Vec::with_capacity(self.body.len() + 2);

        let title = self.title.truncate(outer.saturating_sub(5));
        let mut top = Line::plain(format!("{pad}╭─"));
        if title.is_empty() {
            top.push("─", Style::Plain);
        } else {
            top.push(" ", Style::Plain);
            top.append(title.clone());
            top.push(" ", Style::Plain);
        }
        let used = top.width() - pad_left;
        top.push(format!("{}╮", "─".repeat(outer.saturating_sub(used + 1))), Style::Plain);
        lines.push(top);

        for body_line in &self.body {
            for wrapped in body_line.wrap(inner) {
                let mut line = Line::plain(format!("{pad}│ "));
                line.append(wrapped.pad_to(inner));
                line.push(" │", Style::Plain);
                lines.push(line);
            }
        }

        lines.push(Line::plain(format!(
            "{pad}╰{}╯",
            "─".repeat(outer.saturating_sub(2))
        )));
        lines
    }
}
