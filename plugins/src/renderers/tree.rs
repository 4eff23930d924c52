use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

use richtask_core::api::{
    AggregatedResult, Console, HostResult, LeafResult, RenderConfig, RenderError, ResultField,
    ResultNode, Severity, Style,
};
use richtask_core::console::{Highlighter, Line, Panel, Segment};

const GROUP_GLYPH: &str = "✔";
const LEAF_GLYPH: &str = "•";
const TEST_GLYPH: &str = "●";

/// Current nesting depth of the tree being rendered.
#[derive(Debug, Default)]
pub struct IndentLevel(AtomicUsize);

impl IndentLevel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Go one level deeper until the returned guard is dropped.
    pub fn enter(&self) -> IndentGuard<'_> {
        self.0.fetch_add(1, Ordering::SeqCst);
        IndentGuard(self)
    }
}

pub struct IndentGuard<'a>(&'a IndentLevel);

impl Drop for IndentGuard<'_> {
    fn drop(&mut self) {
        self.0 .0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Per-call knobs of a tree render.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    pub fields: &'a [ResultField],
    /// Report every host as failed in its host line.
    pub force_failed: bool,
    pub severity: Severity,
}

/// Recursive renderer for aggregates, host results and leaves.
pub struct TreeRenderer<'a> {
    config: &'a RenderConfig,
    console: &'a mut Console,
    indent: &'a IndentLevel,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(
        config: &'a RenderConfig,
        console: &'a mut Console,
        indent: &'a IndentLevel,
    ) -> Self {
        Self {
            config,
            console,
            indent,
        }
    }

    pub fn render(
        &mut self,
        node: ResultNode<'_>,
        opts: &RenderOptions<'_>,
    ) -> Result<(), RenderError> {
        match node {
            ResultNode::Aggregate(agg) => self.render_aggregate(agg, opts),
            ResultNode::Host(host) => self.render_host(host, opts),
            ResultNode::Leaf(leaf) => self.render_leaf(leaf, false, opts),
        }
    }

    fn render_aggregate(
        &mut self,
        agg: &AggregatedResult,
        opts: &RenderOptions<'_>,
    ) -> Result<(), RenderError> {
        self.console.print(Line::styled(aggregate_header(agg), Style::Header))?;

        if self.config.show_skipped {
            for host in agg.skipped() {
                self.console
                    .print(Line::styled(format!("- {host} (skipped)"), Style::Skipped))?;
            }
        }

        for (name, host) in agg.iter_hosts() {
            let mut details = Vec::new();
            if host.changed() {
                details.push("changed = true");
            }
            if host.failed() || opts.force_failed {
                details.push("failed = true");
            }
            let mut text = format!("* {name}");
            if !details.is_empty() {
                text.push_str(&format!(" ({})", details.join(", ")));
            }
            self.console.print(Line::styled(text, Style::Host))?;
            self.render_host(host, opts)?;
        }
        Ok(())
    }

    fn render_host(
        &mut self,
        host: &HostResult,
        opts: &RenderOptions<'_>,
    ) -> Result<(), RenderError> {
        let indent = self.indent;
        let _guard = indent.enter();
        self.render_leaf(host.top(), true, opts)?;
        for leaf in host.subtasks() {
            self.render_leaf(leaf, false, opts)?;
        }
        Ok(())
    }

    fn render_leaf(
        &mut self,
        leaf: &LeafResult,
        group: bool,
        opts: &RenderOptions<'_>,
    ) -> Result<(), RenderError> {
        if leaf.severity < opts.severity {
            return Ok(());
        }

        let title = self.leaf_title(leaf);
        let mut body = Vec::new();

        if self.config.display_params {
            if let Some(task) = leaf.task.as_ref().filter(|t| !t.params().is_empty()) {
                let text = pretty(&Value::Object(task.params().clone()));
                body.extend(block("params", &text, Highlighter::None, Style::Params));
            }
        }

        for field in opts.fields {
            if leaf.has_field(*field) {
                body.extend(self.field_block(leaf, *field));
            }
        }

        let indent = self.indent.get();
        if body.is_empty() {
            let glyph = if group { GROUP_GLYPH } else { LEAF_GLYPH };
            let mut line = Line::plain(format!("{}{glyph} ", " ".repeat(indent)));
            line.append(title);
            self.console.print(line)?;
        } else {
            let panel = Panel::new(title, body);
            self.console
                .print_lines(panel.render(self.console.width(), indent + 1))?;
        }
        Ok(())
    }

    fn leaf_title(&self, leaf: &LeafResult) -> Line {
        let style = status_style(leaf);
        let mut details = Vec::new();
        if leaf.changed {
            details.push("changed = true".to_string());
        }
        if !leaf.severity.is_default() {
            details.push(format!("severity = {}", leaf.severity));
        }
        if leaf.failed {
            details.push("failed = true".to_string());
        }

        let mut text = leaf.name.clone();
        if !details.is_empty() {
            text.push_str(&format!(" ({})", details.join(", ")));
        }
        if self.config.timing {
            if let Some(elapsed) = leaf.task.as_ref().and_then(|t| t.run_time()) {
                text.push_str(&format!(" [{}]", format_elapsed(elapsed.num_milliseconds())));
            }
        }
        Line::styled(text, style)
    }

    fn field_block(&self, leaf: &LeafResult, field: ResultField) -> Vec<Line> {
        let label = field.as_str();
        let values = if leaf.failed {
            Highlighter::Red
        } else if self.config.attrib_highlight {
            Highlighter::Repr
        } else {
            Highlighter::None
        };

        match field {
            ResultField::Stdout => text_block(label, leaf.stdout.as_deref(), values),
            ResultField::Stderr => text_block(label, leaf.stderr.as_deref(), values),
            ResultField::Diff => text_block(label, leaf.diff.as_deref(), values),
            ResultField::Result => {
                let text = match &leaf.result {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => pretty(other),
                    None => String::new(),
                };
                block(label, &text, values, Style::Plain)
            }
            ResultField::Exception => match &leaf.exception {
                Some(exc) => block(
                    label,
                    &format!("{}: {}", exc.kind, exc.message),
                    Highlighter::Red,
                    Style::Exception,
                ),
                None => Vec::new(),
            },
            ResultField::Tests => leaf
                .tests
                .iter()
                .map(|test| {
                    let mark = if test.passed { Style::Pass } else { Style::Fail };
                    let mut line = Line::styled(TEST_GLYPH, mark);
                    line.push(format!(" {}", test.name), Style::Plain);
                    if let Some(msg) = &test.message {
                        line.push(format!(": {msg}"), Style::Plain);
                    }
                    line
                })
                .collect(),
        }
    }
}

fn aggregate_header(agg: &AggregatedResult) -> String {
    let mut header = format!("{} (hosts: {}", agg.name(), agg.len());
    if agg.failed() {
        header.push_str(", failed: true");
        header.push_str(&format!(", failed_hosts: [{}]", agg.failed_hosts().join(", ")));
    }
    header.push(')');
    header
}

fn status_style(leaf: &LeafResult) -> Style {
    if leaf.failed {
        Style::Failed
    } else if leaf.changed {
        Style::Changed
    } else {
        Style::Ok
    }
}

/// `H:MM:SS.mmm`
pub(crate) fn format_elapsed(millis: i64) -> String {
    let millis = millis.max(0);
    let (h, rem) = (millis / 3_600_000, millis % 3_600_000);
    let (m, rem) = (rem / 60_000, rem % 60_000);
    let (s, ms) = (rem / 1_000, rem % 1_000);
    format!("{h}:{m:02}:{s:02}.{ms:03}")
}

/// Pretty JSON. Payloads are already `Value`s, so this cannot fail.
fn pretty(value: &Value) -> String {
    format!("{value:#}")
}

fn text_block(label: &str, value: Option<&str>, highlighter: Highlighter) -> Vec<Line> {
    block(label, value.unwrap_or_default(), highlighter, Style::Plain)
}

/// `"{label} = {value}"`, with continuation lines kept as they are.
fn block(label: &str, value: &str, highlighter: Highlighter, base: Style) -> Vec<Line> {
    let mut segments = vec![Segment::new(format!("{label} = "), Style::Bold)];
    segments.extend(highlighter.highlight(value.trim_end_matches('\n'), base));
    Line::split_segments(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use richtask_core::api::{TaskException, TaskRun};
    use serde_json::json;
    use std::sync::Arc;

    fn text(console: &Console) -> String {
        console.export_text()
    }

    fn config() -> RenderConfig {
        RenderConfig {
            width: 40,
            timing: false,
            ..RenderConfig::default()
        }
    }

    fn opts(fields: &[ResultField]) -> RenderOptions<'_> {
        RenderOptions {
            fields,
            force_failed: false,
            severity: Severity::Info,
        }
    }

    fn aggregate() -> AggregatedResult {
        let task = Arc::new(TaskRun::new("deploy"));
        let mut agg = AggregatedResult::new(Arc::clone(&task));
        agg.insert(HostResult::new(
            "r2",
            LeafResult::new("deploy", "r2").task(Arc::clone(&task)),
        ))
        .unwrap();
        let mut r1 = HostResult::new(
            "r1",
            LeafResult::new("deploy", "r1")
                .changed(true)
                .stdout("applied")
                .task(Arc::clone(&task)),
        );
        r1.push(
            LeafResult::new("verify", "r1")
                .failed(true)
                .severity(Severity::Error)
                .exception(TaskException::new("CommandError", "exit 2")),
        );
        agg.insert(r1).unwrap();
        agg.mark_skipped("r3");
        agg
    }

    #[test]
    fn test_bare_leaf_line() {
        let cfg = config();
        let mut console = Console::buffer(40);
        let indent = IndentLevel::new();
        let leaf = LeafResult::new("ping", "r1");
        TreeRenderer::new(&cfg, &mut console, &indent)
            .render(ResultNode::Leaf(&leaf), &opts(&[ResultField::Stdout]))
            .unwrap();
        assert_eq!(text(&console), "• ping\n");
    }

    #[test]
    fn test_aggregate_tree() {
        let cfg = RenderConfig {
            show_skipped: true,
            ..config()
        };
        let mut console = Console::buffer(40);
        let indent = IndentLevel::new();
        let agg = aggregate();
        TreeRenderer::new(&cfg, &mut console, &indent)
            .render(
                ResultNode::Aggregate(&agg),
                &opts(&[ResultField::Stdout, ResultField::Exception]),
            )
            .unwrap();

        let expected = "\
deploy (hosts: 2, failed: true, failed_hosts: [r1])
- r3 (skipped)
* r1 (changed = true, failed = true)
  ╭─ deploy (changed = true) ──────────╮
  │ stdout = applied                   │
  ╰────────────────────────────────────╯
  ╭─ verify (severity = ERROR, failed… ╮
  │ exception = CommandError: exit 2   │
  ╰────────────────────────────────────╯
* r2
 ✔ deploy
";
        assert_eq!(text(&console), expected);
        assert_eq!(indent.get(), 0);
    }

    #[test]
    fn test_force_failed_marks_every_host() {
        let cfg = config();
        let mut console = Console::buffer(40);
        let indent = IndentLevel::new();
        let agg = aggregate();
        TreeRenderer::new(&cfg, &mut console, &indent)
            .render(
                ResultNode::Aggregate(&agg),
                &RenderOptions {
                    force_failed: true,
                    ..opts(&[])
                },
            )
            .unwrap();
        let out = text(&console);
        assert!(out.contains("* r2 (failed = true)\n"));
        assert!(!out.contains("(skipped)"));
    }

    #[test]
    fn test_severity_threshold_hides_leaves_only() {
        let cfg = config();
        let mut console = Console::buffer(40);
        let indent = IndentLevel::new();
        let agg = aggregate();
        TreeRenderer::new(&cfg, &mut console, &indent)
            .render(
                ResultNode::Aggregate(&agg),
                &RenderOptions {
                    severity: Severity::Error,
                    ..opts(&[ResultField::Stdout])
                },
            )
            .unwrap();
        let out = text(&console);
        assert!(out.contains("* r1 (changed = true, failed = true)"));
        assert!(out.contains("* r2"));
        assert!(!out.contains("deploy (changed"));
        assert!(out.contains("verify"));
    }

    #[test]
    fn test_result_values_and_tests() {
        let cfg = RenderConfig {
            display_params: true,
            ..config()
        };
        let mut params = serde_json::Map::new();
        params.insert("x".into(), json!(1));
        let task = Arc::new(TaskRun::new("check").with_params(params));
        let leaf = LeafResult::new("check", "r1")
            .result(json!({"up": true}))
            .test(richtask_core::api::TestAssertion {
                name: "reachable".into(),
                passed: true,
                message: None,
            })
            .test(richtask_core::api::TestAssertion {
                name: "bgp".into(),
                passed: false,
                message: Some("down".into()),
            })
            .task(task);

        let mut console = Console::buffer(40);
        let indent = IndentLevel::new();
        TreeRenderer::new(&cfg, &mut console, &indent)
            .render(
                ResultNode::Leaf(&leaf),
                &opts(&[ResultField::Result, ResultField::Tests]),
            )
            .unwrap();
        let out = text(&console);
        assert!(out.contains("│ params = {"));
        assert!(out.contains("│   \"x\": 1"));
        assert!(out.contains("│ result = {"));
        assert!(out.contains("│   \"up\": true"));
        assert!(out.contains("│ ● reachable"));
        assert!(out.contains("│ ● bgp: down"));
    }

    #[test]
    fn test_failed_values_painted_red() {
        let cfg = config();
        let mut console = Console::buffer(40);
        let indent = IndentLevel::new();
        let leaf = LeafResult::new("cmd", "r1").failed(true).stdout("boom 42");
        TreeRenderer::new(&cfg, &mut console, &indent)
            .render(ResultNode::Leaf(&leaf), &opts(&[ResultField::Stdout]))
            .unwrap();
        let body = &console.recorded()[1];
        assert!(body
            .segments()
            .iter()
            .any(|s| s.text.contains("boom") && s.style == Style::Exception));
    }

    #[test]
    fn test_timing_suffix() {
        let cfg = RenderConfig {
            timing: true,
            ..config()
        };
        let task = Arc::new(TaskRun::new("ping"));
        let start = chrono::Utc::now();
        task.mark_started_at(start);
        task.mark_finished_at(start + chrono::Duration::milliseconds(61_250));
        let leaf = LeafResult::new("ping", "r1").task(Arc::clone(&task));
        let untimed = LeafResult::new("ping", "r1").task(Arc::new(TaskRun::new("ping")));

        let mut console = Console::buffer(40);
        let indent = IndentLevel::new();
        let mut renderer = TreeRenderer::new(&cfg, &mut console, &indent);
        renderer.render(ResultNode::Leaf(&leaf), &opts(&[])).unwrap();
        renderer.render(ResultNode::Leaf(&untimed), &opts(&[])).unwrap();
        assert_eq!(text(&console), "• ping [0:01:01.250]\n• ping\n");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00:00.000");
        assert_eq!(format_elapsed(3_723_004), "1:02:03.004");
        assert_eq!(format_elapsed(-5), "0:00:00.000");
    }

    #[test]
    fn test_nested_result_pretty_printed() {
        let cfg = config();
        let leaf = LeafResult::new("facts", "r1").result(json!({
            "iface": {"name": "接口", "mtu": 1500},
            "vlans": [10, 20]
        }));
        let mut console = Console::buffer(40);
        let indent = IndentLevel::new();
        TreeRenderer::new(&cfg, &mut console, &indent)
            .render(ResultNode::Leaf(&leaf), &opts(&[ResultField::Result]))
            .unwrap();
        let out = text(&console);
        assert!(out.contains("│   \"iface\": {"));
        assert!(out.contains("│     \"name\": \"接口\""));
        assert!(out.contains("│     10,"));
        assert!(console.recorded().iter().all(|l| l.width() == 40));
    }
}
