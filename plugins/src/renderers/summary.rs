use std::ops::AddAssign;

use richtask_core::api::{AggregatedResult, Line, Style};
use richtask_core::console::{Column, Table};

/// Leaf counts for one task, or the total across tasks.
///
/// A leaf that is both changed and failed counts in both columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryCounts {
    pub ok: usize,
    pub changed: usize,
    pub failed: usize,
}

impl SummaryCounts {
    pub fn from_aggregate(agg: &AggregatedResult) -> Self {
        let mut counts = Self::default();
        for (_, host) in agg.iter_hosts() {
            for leaf in host.leaves() {
                if leaf.is_ok() {
                    counts.ok += 1;
                }
                if leaf.changed {
                    counts.changed += 1;
                }
                if leaf.failed {
                    counts.failed += 1;
                }
            }
        }
        counts
    }
}

impl AddAssign for SummaryCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.ok += rhs.ok;
        self.changed += rhs.changed;
        self.failed += rhs.failed;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub rows: Vec<(String, SummaryCounts)>,
    pub total: SummaryCounts,
}

/// One row per recorded aggregate, in recording order.
pub fn tally<'a>(history: impl IntoIterator<Item = &'a AggregatedResult>) -> Summary {
    let mut summary = Summary::default();
    for agg in history {
        let counts = SummaryCounts::from_aggregate(agg);
        summary.total += counts;
        summary.rows.push((agg.name().to_string(), counts));
    }
    summary
}

fn count_cell(count: usize, style: Style) -> Line {
    if count == 0 {
        Line::plain("-")
    } else {
        Line::styled(count.to_string(), style)
    }
}

impl Summary {
    pub fn to_table(&self) -> Table {
        let mut table = Table::new()
            .column(Column::new("Task").ratio(5).no_wrap().footer("Total"))
            .column(Column::new("Ok"))
            .column(Column::new("Changed"))
            .column(Column::new("Failed"));

        for (name, counts) in &self.rows {
            table.add_row(vec![
                vec![Line::plain(name.clone())],
                vec![count_cell(counts.ok, Style::Ok)],
                vec![count_cell(counts.changed, Style::Changed)],
                vec![count_cell(counts.failed, Style::Failed)],
            ]);
        }

        table.set_footer(1, count_cell(self.total.ok, Style::Ok));
        table.set_footer(2, count_cell(self.total.changed, Style::Changed));
        table.set_footer(3, count_cell(self.total.failed, Style::Failed));
        table
    }

    pub fn render(&self, width: usize) -> Vec<Line> {
        self.to_table().render(width)
    }
}
