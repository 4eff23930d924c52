use super::{Line, Style};

#[derive(Debug, Clone)]
pub struct Column {
    header: String,
    ratio: usize,
    footer: Option<Line>,
    no_wrap: bool,
}

impl Column {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ratio: 1,
            footer: None,
            no_wrap: false,
        }
    }

    pub fn ratio(mut self, ratio: usize) -> Self {
        self.ratio = ratio.max(1);
        self
    }

    pub fn footer(mut self, footer: impl Into<Line>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn no_wrap(mut self) -> Self {
        self.no_wrap = true;
        self
    }
}

/// Rounded-box table whose columns share the width by ratio.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Vec<Line>>>,
    show_lines: bool,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Draw a separator between body rows.
    pub fn show_lines(mut self, show: bool) -> Self {
        self.show_lines = show;
        self
    }

    pub fn set_footer(&mut self, column: usize, footer: impl Into<Line>) {
        if let Some(col) = self.columns.get_mut(column) {
            col.footer = Some(footer.into());
        }
    }

    /// Add a row; each cell may span several lines. Missing cells are blank.
    pub fn add_row(&mut self, cells: Vec<Vec<Line>>) {
        self.rows.push(cells);
    }

    fn column_widths(&self, width: usize) -> Vec<usize> {
        let n = self.columns.len();
        // borders: n + 1, padding: one space each side per column
        let inner = width.saturating_sub(n + 1 + 2 * n).max(n);
        let total: usize = self.columns.iter().map(|c| c.ratio).sum();
        let mut widths: Vec<usize> = self
            .columns
            .iter()
            .map(|c| (inner * c.ratio / total).max(1))
            .collect();
        let assigned: usize = widths.iter().sum();
        if let Some(first) = widths.first_mut() {
            *first += inner.saturating_sub(assigned);
        }
        widths
    }

    pub fn render(&self, width: usize) -> Vec<Line> {
        if self.columns.is_empty() {
            return Vec::new();
        }
        let widths = self.column_widths(width);
        let mut out = Vec::new();

        out.push(rule(&widths, '╭', '┬', '╮'));
        let headers: Vec<Vec<Line>> = self
            .columns
            .iter()
            .map(|c| vec![Line::styled(c.header.clone(), Style::Bold)])
            .collect();
        out.extend(self.render_row(&headers, &widths));
        out.push(rule(&widths, '├', '┼', '┤'));

        for (idx, row) in self.rows.iter().enumerate() {
            if idx > 0 && self.show_lines {
                out.push(rule(&widths, '├', '┼', '┤'));
            }
            out.extend(self.render_row(row, &widths));
        }

        if self.columns.iter().any(|c| c.footer.is_some()) {
            out.push(rule(&widths, '├', '┼', '┤'));
            let footers: Vec<Vec<Line>> = self
                .columns
                .iter()
                .map(|c| c.footer.clone().into_iter().collect())
                .collect();
            out.extend(self.render_row(&footers, &widths));
        }

        out.push(rule(&widths, '╰', '┴', '╯'));
        out
    }

    fn render_row(&self, cells: &[Vec<Line>], widths: &[usize]) -> Vec<Line> {
        let empty = Vec::new();
        let columns: Vec<Vec<Line>> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = cells.get(i).unwrap_or(&empty);
                let no_wrap = self.columns.get(i).is_some_and(|c| c.no_wrap);
                cell.iter()
                    .flat_map(|line| {
                        if no_wrap {
                            vec![line.truncate(*w)]
                        } else {
                            line.wrap(*w)
                        }
                    })
                    .collect()
            })
            .collect();
        let height = columns.iter().map(Vec::len).max().unwrap_or(0).max(1);

        (0..height)
            .map(|row| {
                let mut line = Line::plain("│");
                for (col, w) in columns.iter().zip(widths) {
                    line.push(" ", Style::Plain);
                    let cell = col.get(row).cloned().unwrap_or_default();
                    line.append(cell.pad_to(*w));
                    line.push(" │", Style::Plain);
                }
                line
            })
            .collect()
    }
}

fn rule(widths: &[usize], left: char, mid: char, right: char) -> Line {
    let parts: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    Line::plain(format!("{left}{}{right}", parts.join(&mid.to_string())))
}
