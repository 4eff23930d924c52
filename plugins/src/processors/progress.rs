use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use uuid::Uuid;

use richtask_core::api::{AggregatedResult, Host, HostResult, Processor, TaskRun};

/// One progress bar per running task.
///
/// The bar starts at length 1 for the task itself and grows by one per host
/// or subtask instance. Successful completions advance it; failures leave a
/// visible gap. When disabled the bars are hidden but still count.
pub struct ProgressTracker {
    enabled: bool,
    bars: Mutex<HashMap<Uuid, ProgressBar>>,
}

impl ProgressTracker {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            bars: Mutex::new(HashMap::new()),
        }
    }

    /// `(position, length)` of a running task's bar.
    pub fn snapshot(&self, task_id: Uuid) -> Option<(u64, u64)> {
        self.lock()
            .get(&task_id)
            .map(|bar| (bar.position(), bar.length().unwrap_or(0)))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, ProgressBar>> {
        self.bars
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn new_bar(&self, task: &TaskRun) -> ProgressBar {
        if !self.enabled {
            let bar = ProgressBar::hidden();
            bar.set_length(1);
            return bar;
        }

        let bar = ProgressBar::new(1);
        if let Ok(style) = ProgressStyle::with_template(
            "{msg} {bar:40.cyan/blue} {percent:>3}% [{elapsed_precise}]",
        ) {
            bar.set_style(style.progress_chars("█▓▒░  "));
        }
        bar.set_message(task.name().to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }

    fn with_bar(&self, task: &TaskRun, f: impl FnOnce(&ProgressBar)) {
        match self.lock().get(&task.root_id()) {
            Some(bar) => f(bar),
            None => tracing::debug!(task = task.name(), id = %task.root_id(), "no progress bar"),
        }
    }

    fn grow(&self, task: &TaskRun) {
        self.with_bar(task, |bar| bar.inc_length(1));
    }

    fn advance(&self, task: &TaskRun, result: &HostResult) {
        if !result.failed() {
            self.with_bar(task, |bar| bar.inc(1));
        }
    }
}

impl Processor for ProgressTracker {
    fn name(&self) -> &str {
        "progress"
    }

    fn task_started(&self, task: &TaskRun) {
        let bar = self.new_bar(task);
        self.lock().insert(task.root_id(), bar);
    }

    fn task_completed(&self, task: &TaskRun, result: &AggregatedResult) {
        let Some(bar) = self.lock().remove(&task.root_id()) else {
            tracing::debug!(task = task.name(), "completed task had no progress bar");
            return;
        };
        if !result.failed() {
            bar.inc(1);
        }
        bar.finish();
    }

    fn task_instance_started(&self, task: &TaskRun, _host: &Host) {
        self.grow(task);
    }

    fn task_instance_completed(&self, task: &TaskRun, _host: &Host, result: &HostResult) {
        self.advance(task, result);
    }

    fn subtask_instance_started(&self, task: &TaskRun, _host: &Host) {
        self.grow(task);
    }

    fn subtask_instance_completed(&self, task: &TaskRun, _host: &Host, result: &HostResult) {
        self.advance(task, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use richtask_core::api::LeafResult;
    use serde_json::Map;
    use std::sync::Arc;

    fn ok(host: &str) -> HostResult {
        HostResult::new(host, LeafResult::new("t", host))
    }

    fn failed(host: &str) -> HostResult {
        HostResult::new(host, LeafResult::new("t", host).failed(true))
    }

    #[test]
    fn test_counts_follow_lifecycle() {
        let tracker = ProgressTracker::new(false);
        let task = TaskRun::new("t");
        let id = task.id();
        let (r1, r2) = (Host::new("r1"), Host::new("r2"));

        tracker.task_started(&task);
        assert_eq!(tracker.snapshot(id), Some((0, 1)));

        let i1 = task.for_host();
        let i2 = task.for_host();
        tracker.task_instance_started(&i1, &r1);
        tracker.task_instance_started(&i2, &r2);
        let sub = i1.subtask("child", Map::new());
        tracker.subtask_instance_started(&sub, &r1);
        assert_eq!(tracker.snapshot(id), Some((0, 4)));

        tracker.subtask_instance_completed(&sub, &r1, &ok("r1"));
        tracker.task_instance_completed(&i1, &r1, &ok("r1"));
        tracker.task_instance_completed(&i2, &r2, &failed("r2"));
        assert_eq!(tracker.snapshot(id), Some((2, 4)));

        let mut agg = AggregatedResult::new(Arc::new(task));
        agg.insert(ok("r1")).unwrap();
        agg.insert(failed("r2")).unwrap();
        tracker.task_completed(agg.task(), &agg);
        assert_eq!(tracker.snapshot(id), None);
    }

    #[test]
    fn test_unknown_task_ignored() {
        let tracker = ProgressTracker::new(false);
        let task = TaskRun::new("orphan");
        tracker.task_instance_started(&task, &Host::new("r1"));
        tracker.task_instance_completed(&task, &Host::new("r1"), &ok("r1"));
        assert_eq!(tracker.snapshot(task.id()), None);

        let agg = AggregatedResult::new(Arc::new(task));
        tracker.task_completed(agg.task(), &agg);
    }

    #[test]
    fn test_tasks_tracked_separately() {
        let tracker = ProgressTracker::new(false);
        let a = TaskRun::new("a");
        let b = TaskRun::new("b");
        tracker.task_started(&a);
        tracker.task_started(&b);
        tracker.task_instance_started(&a.for_host(), &Host::new("r1"));
        assert_eq!(tracker.snapshot(a.id()), Some((0, 2)));
        assert_eq!(tracker.snapshot(b.id()), Some((0, 1)));
    }
}
