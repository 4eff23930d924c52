use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use richtask_core::api::{
    AggregatedResult, Console, ExportFormat, Host, HostResult, Inventory, Processor,
    RenderConfig, RenderError, ResultField, ResultNode, Severity, TaskRun,
};

use crate::renderers::inventory::dump;
use crate::renderers::{tally, IndentLevel, RenderOptions, Summary, TreeRenderer};

/// Everything an output operation needs exclusive access to.
pub struct OutputState {
    console: Console,
    history: Vec<AggregatedResult>,
    indent: IndentLevel,
}

impl OutputState {
    fn new(console: Console) -> Self {
        Self {
            console,
            history: Vec::new(),
            indent: IndentLevel::new(),
        }
    }
}

/// Tree-style result printer, summary table and inventory dump.
///
/// Registered as a [`Processor`] it stamps task timing and prints every
/// aggregate as its task completes. Each output operation holds the state
/// lock for its whole duration so renders never interleave.
pub struct RichResults {
    config: RenderConfig,
    state: Arc<Mutex<OutputState>>,
}

impl RichResults {
    /// Print to stdout.
    pub fn new(config: RenderConfig) -> Self {
        let mut console = Console::stdout(config.width, true);
        if !config.color {
            console.set_color(false);
        }
        Self::with_console(config, console)
    }

    pub fn with_console(config: RenderConfig, console: Console) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(OutputState::new(console))),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, OutputState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Render a result tree. Aggregates are also added to the history used
    /// by [`summarize`](Self::summarize).
    pub fn print(
        &self,
        node: ResultNode<'_>,
        fields: Option<&[ResultField]>,
        force_failed: bool,
        severity: Option<Severity>,
    ) -> Result<(), RenderError> {
        let mut guard = self.lock();
        let state = &mut *guard;

        if let ResultNode::Aggregate(agg) = node {
            state.history.push(agg.clone());
        }

        let opts = RenderOptions {
            fields: fields.unwrap_or(&self.config.fields),
            force_failed,
            severity: severity.unwrap_or(self.config.severity_threshold),
        };
        TreeRenderer::new(&self.config, &mut state.console, &state.indent).render(node, &opts)?;
        state.console.blank()?;
        Ok(())
    }

    /// Counts over every aggregate printed so far.
    pub fn tally(&self) -> Summary {
        tally(&self.lock().history)
    }

    /// Print the summary table and return the counts behind it.
    pub fn summarize(&self) -> Result<Summary, RenderError> {
        let mut state = self.lock();
        let summary = tally(&state.history);
        let lines = summary.render(state.console.width());
        state.console.print_lines(lines)?;
        Ok(summary)
    }

    pub fn inventory(&self, inventory: &Inventory, reveal_secrets: bool) -> Result<(), RenderError> {
        let mut state = self.lock();
        let lines = dump(
            inventory,
            reveal_secrets,
            self.config.attrib_highlight,
            state.console.width(),
        )?;
        state.console.print_lines(lines)?;
        Ok(())
    }

    /// Save everything printed so far.
    pub fn write(&self, path: impl AsRef<Path>, format: ExportFormat) -> Result<(), RenderError> {
        let path = path.as_ref();
        let state = self.lock();
        state.console.save(path, format)?;
        tracing::debug!(path = %path.display(), %format, "output exported");
        Ok(())
    }

    pub fn export(&self, format: ExportFormat) -> String {
        let state = self.lock();
        match format {
            ExportFormat::Text => state.console.export_text(),
            ExportFormat::Html => state.console.export_html(),
        }
    }

    pub fn history_len(&self) -> usize {
        self.lock().history.len()
    }

    pub fn indent_level(&self) -> usize {
        self.lock().indent.get()
    }
}

impl Processor for RichResults {
    fn name(&self) -> &str {
        "rich_results"
    }

    fn task_started(&self, task: &TaskRun) {
        task.mark_started();
    }

    fn task_completed(&self, task: &TaskRun, result: &AggregatedResult) {
        task.mark_finished();

        if task.severity_level() < self.config.severity_threshold {
            self.lock().history.push(result.clone());
            return;
        }
        if let Err(err) = self.print(ResultNode::Aggregate(result), None, false, None) {
            tracing::warn!(task = task.name(), error = %err, "failed to print results");
        }
    }

    fn task_instance_started(&self, task: &TaskRun, _host: &Host) {
        task.mark_started();
    }

    fn task_instance_completed(&self, task: &TaskRun, _host: &Host, _result: &HostResult) {
        task.mark_finished();
    }

    fn subtask_instance_started(&self, task: &TaskRun, _host: &Host) {
        task.mark_started();
    }

    fn subtask_instance_completed(&self, task: &TaskRun, _host: &Host, _result: &HostResult) {
        task.mark_finished();
    }
}
