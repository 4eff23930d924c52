use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::Map;

use richtask_core::api::{
    AggregatedResult, Console, ExportFormat, Host, HostResult, Inventory, LeafResult, Processors,
    RenderConfig, RenderError, ResultField, ResultNode, Runner, Severity, Task, TaskContext,
    TaskError, TaskOutput, TaskRun,
};
use richtask_plugins::processors::{ProgressTracker, RichResults};
use richtask_plugins::renderers::SummaryCounts;

fn config() -> RenderConfig {
    RenderConfig {
        width: 60,
        timing: false,
        ..RenderConfig::default()
    }
}

fn rich() -> RichResults {
    RichResults::with_console(config(), Console::buffer(60))
}

/// Host A ok; host B with a changed leaf and a failed leaf.
fn two_hosts() -> AggregatedResult {
    let task = Arc::new(TaskRun::new("configure"));
    let mut agg = AggregatedResult::new(Arc::clone(&task));
    agg.insert(HostResult::new(
        "A",
        LeafResult::new("configure", "A").stdout("nothing to do"),
    ))
    .unwrap();
    let mut b = HostResult::new(
        "B",
        LeafResult::new("configure", "B")
            .changed(true)
            .diff("+ ntp server 10.0.0.1"),
    );
    b.push(
        LeafResult::new("verify", "B")
            .failed(true)
            .severity(Severity::Warning)
            .stderr("ntp unsynchronised"),
    );
    agg.insert(b).unwrap();
    agg
}

#[test]
fn summary_counts_two_host_scenario() {
    let rich = rich();
    rich.print(ResultNode::Aggregate(&two_hosts()), None, false, None)
        .unwrap();
    let summary = rich.summarize().unwrap();
    let expected = SummaryCounts {
        ok: 1,
        changed: 1,
        failed: 1,
    };
    assert_eq!(summary.rows, vec![("configure".to_string(), expected)]);
    assert_eq!(summary.total, expected);
    let total = summary.total.ok + summary.total.changed + summary.total.failed;
    assert_eq!(total, 3);
}

#[test]
fn summarize_is_idempotent() {
    let rich = rich();
    rich.print(ResultNode::Aggregate(&two_hosts()), None, false, None)
        .unwrap();
    let before = rich.export(ExportFormat::Text);
    rich.summarize().unwrap();
    let once = rich.export(ExportFormat::Text)[before.len()..].to_string();
    rich.summarize().unwrap();
    let twice = rich.export(ExportFormat::Text)[before.len() + once.len()..].to_string();
    assert_eq!(once, twice);
    assert_eq!(rich.history_len(), 1);
}

#[test]
fn rendering_same_node_twice_is_identical() {
    let agg = two_hosts();
    let first = rich();
    first.print(ResultNode::Aggregate(&agg), None, false, None)
        .unwrap();
    let second = rich();
    second
        .print(ResultNode::Aggregate(&agg), None, false, None)
        .unwrap();
    second
        .print(ResultNode::Aggregate(&agg), None, false, None)
        .unwrap();

    let one = first.export(ExportFormat::Text);
    let both = second.export(ExportFormat::Text);
    assert_eq!(both, format!("{one}{one}"));
}

#[test]
fn raising_threshold_only_removes_lines() {
    let agg = two_hosts();
    let fields = [ResultField::Stdout, ResultField::Stderr, ResultField::Diff];
    let mut previous: Option<Vec<String>> = None;

    for threshold in [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ] {
        let rich = rich();
        rich.print(ResultNode::Aggregate(&agg), Some(&fields), false, Some(threshold))
            .unwrap();
        let lines: Vec<String> = rich
            .export(ExportFormat::Text)
            .lines()
            .map(String::from)
            .collect();

        if let Some(prev) = &previous {
            assert!(lines.len() <= prev.len());
            for line in &lines {
                assert!(prev.contains(line), "{line:?} appeared at {threshold}");
            }
        }
        previous = Some(lines);
    }

    let last = previous.unwrap();
    assert_eq!(
        last,
        vec![
            "configure (hosts: 2, failed: true, failed_hosts: [B])",
            "* A",
            "* B (changed = true, failed = true)",
            "",
        ]
    );
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn indent_balanced_after_sink_failure() {
    let rich = RichResults::with_console(
        config(),
        Console::with_writer(Box::new(FailingWriter), 60, false),
    );
    let agg = two_hosts();
    let err = rich
        .print(ResultNode::Aggregate(&agg), None, false, None)
        .unwrap_err();
    assert!(matches!(err, RenderError::Sink(_)));
    assert_eq!(rich.indent_level(), 0);

    let err = rich
        .print(ResultNode::Host(agg.get("B").unwrap()), None, false, None)
        .unwrap_err();
    assert!(matches!(err, RenderError::Sink(_)));
    assert_eq!(rich.indent_level(), 0);
}

#[test]
fn inventory_dump_redacts_unless_revealed() {
    let mut r1 = Host::new("r1");
    r1.password = Some("s3cret-pw".into());
    r1.platform = Some("ios".into());
    let inv = Inventory::new(vec![r1, Host::new("r2")]).unwrap();

    let hidden = rich();
    hidden.inventory(&inv, false).unwrap();
    let text = hidden.export(ExportFormat::Text);
    assert!(!text.contains("s3cret-pw"));
    assert!(text.contains("******"));
    assert!(text.contains("platform: ios"));

    let shown = rich();
    shown.inventory(&inv, true).unwrap();
    assert!(shown.export(ExportFormat::Text).contains("s3cret-pw"));
    assert_eq!(inv.get("r1").unwrap().password.as_deref(), Some("s3cret-pw"));
}

fn fleet(name: &str) -> AggregatedResult {
    let task = Arc::new(TaskRun::new(name));
    let mut agg = AggregatedResult::new(Arc::clone(&task));
    for host in ["edge-1", "edge-2", "core-1"] {
        let mut result = HostResult::new(
            host,
            LeafResult::new(name, host).stdout(format!("{name} on {host}")),
        );
        result.push(LeafResult::new("verify", host).changed(true));
        agg.insert(result).unwrap();
    }
    agg
}

#[test]
fn concurrent_prints_never_interleave() {
    const TASKS: usize = 8;
    const ROUNDS: usize = 5;

    let aggregates: Vec<AggregatedResult> =
        (0..TASKS).map(|i| fleet(&format!("task-{i}"))).collect();
    let blocks: Vec<String> = aggregates
        .iter()
        .map(|agg| {
            let alone = rich();
            alone
                .print(ResultNode::Aggregate(agg), None, false, None)
                .unwrap();
            alone.export(ExportFormat::Text)
        })
        .collect();

    let shared = Arc::new(rich());
    std::thread::scope(|scope| {
        for agg in &aggregates {
            let shared = Arc::clone(&shared);
            scope.spawn(move || {
                for _ in 0..ROUNDS {
                    shared
                        .print(ResultNode::Aggregate(agg), None, false, None)
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(shared.history_len(), TASKS * ROUNDS);
    assert_eq!(shared.indent_level(), 0);

    // The export must be a sequence of whole per-task blocks.
    let out = shared.export(ExportFormat::Text);
    let mut seen = vec![0usize; TASKS];
    let mut rest = out.as_str();
    while !rest.is_empty() {
        let idx = blocks
            .iter()
            .position(|b| rest.starts_with(b.as_str()))
            .unwrap_or_else(|| {
                let head: String = rest.chars().take(60).collect();
                panic!("interleaved output at: {head:?}")
            });
        seen[idx] += 1;
        rest = &rest[blocks[idx].len()..];
    }
    assert_eq!(seen, vec![ROUNDS; TASKS]);
}

#[test]
fn html_export_written_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.html");
    let rich = rich();
    rich.print(ResultNode::Aggregate(&two_hosts()), None, false, None)
        .unwrap();
    rich.write(&path, ExportFormat::Html).unwrap();
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("configure (hosts: 2"));
    assert!(html.contains("<span style="));
}

struct Deploy;

#[async_trait]
impl Task for Deploy {
    fn name(&self) -> &str {
        "deploy"
    }

    async fn run(&self, ctx: &mut TaskContext) -> Result<TaskOutput, TaskError> {
        let check = ctx.run_subtask(&Check, Map::new()).await;
        Ok(TaskOutput::new()
            .changed(!check.failed)
            .stdout(format!("deployed to {}", ctx.host().name)))
    }
}

struct Check;

#[async_trait]
impl Task for Check {
    fn name(&self) -> &str {
        "check"
    }

    async fn run(&self, ctx: &mut TaskContext) -> Result<TaskOutput, TaskError> {
        if ctx.host().name == "r3" {
            return Err(TaskError::Command("unreachable".into()));
        }
        Ok(TaskOutput::new())
    }
}

#[tokio::test]
async fn runner_drives_renderer_and_progress() {
    let rich = Arc::new(RichResults::with_console(
        RenderConfig {
            timing: true,
            ..config()
        },
        Console::buffer(60),
    ));
    let tracker = Arc::new(ProgressTracker::new(false));
    let processors = Processors::new()
        .with(tracker.clone())
        .with(rich.clone());

    let inv = Inventory::new(vec![Host::new("r1"), Host::new("r2"), Host::new("r3")]).unwrap();
    let runner = Runner::new(2, Arc::new(processors));
    let agg = runner
        .run(&inv, Arc::new(Deploy), TaskRun::new("deploy"), false)
        .await
        .unwrap();

    assert_eq!(agg.failed_hosts(), vec!["r3"]);
    assert!(agg.task().run_time().is_some());
    for (_, host) in agg.iter_hosts() {
        for leaf in host.leaves() {
            let run = leaf.task.as_ref().unwrap();
            assert!(run.run_time().is_some(), "{} on {}", leaf.name, host.host());
        }
    }
    assert_eq!(tracker.snapshot(agg.task().id()), None);

    let text = rich.export(ExportFormat::Text);
    assert!(text.starts_with("deploy (hosts: 3, failed: true, failed_hosts: [r3])\n"));
    assert!(text.contains("* r1 (changed = true)\n"));
    assert!(text.contains("* r3 (failed = true)\n"));
    assert!(text.contains("result = command failed: unreachable"));
    assert_eq!(rich.history_len(), 1);
    assert_eq!(rich.indent_level(), 0);
}
