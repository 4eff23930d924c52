use richtask_core::api::{CliError, TaskRun};
use richtask_plugins::factory::build_task;
use richtask_plugins::plan::{parse_args, Plan};

use crate::app::App;
use crate::commands::cli::{AdhocArgs, BatchArgs};

/// Runs a single task; returns the exit code (1 when any host failed).
pub async fn handle_adhoc(app: &App, args: &AdhocArgs) -> Result<i32, CliError> {
    let task = build_task(&args.module)?;
    let params = match args.args.as_deref() {
        Some(raw) => parse_args(raw)?,
        None => Default::default(),
    };
    let name = args.name.as_deref().unwrap_or(&args.module);
    let mut run = TaskRun::new(name).with_params(params);
    if let Some(severity) = args.task_severity {
        run = run.with_severity(severity);
    }

    let runner = app.runner();
    let result = runner.run(&app.inventory, task, run, false).await?;
    Ok(exit_for(result.failed()))
}

/// Runs the plan's steps in order. Hosts that fail drop out of later steps
/// unless a step sets `on_failed: true`.
pub async fn handle_batch(app: &App, args: &BatchArgs) -> Result<i32, CliError> {
    let plan = Plan::load(&args.plan)?;
    let runner = app.runner();
    let mut any_failed = false;

    for step in &plan.tasks {
        let (task, run) = step.build()?;
        tracing::info!(task = step.name(), module = %step.module, "running plan step");
        let result = runner
            .run(&app.inventory, task, run, step.on_failed)
            .await?;
        any_failed |= result.failed();
    }

    let failed = runner.failed_hosts();
    if !failed.is_empty() {
        tracing::warn!(hosts = ?failed, "hosts failed during the plan");
    }
    Ok(exit_for(any_failed))
}

fn exit_for(failed: bool) -> i32 {
    if failed {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cli::Args;
    use clap::Parser;
    use richtask_core::api::AppConfig;
    use std::path::Path;

    fn app_for(dir: &Path, extra: &[&str]) -> App {
        let hosts = dir.join("hosts.yaml");
        std::fs::write(&hosts, "r1:\n  hostname: 10.0.0.1\nr2:\n  hostname: 10.0.0.2\n").unwrap();
        let mut argv = vec![
            "richtask".to_string(),
            "-i".to_string(),
            hosts.display().to_string(),
            "--no-progress".to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        argv.push("inventory".to_string());
        let args = Args::parse_from(argv);
        let mut config = AppConfig::default();
        config.render.color = false;
        App::new(&args, config).unwrap()
    }

    #[tokio::test]
    async fn test_adhoc_echo_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_for(dir.path(), &[]);
        let args = AdhocArgs {
            module: "echo_data".to_string(),
            args: Some("x=1,y=a,b".to_string()),
            name: Some("say".to_string()),
            task_severity: None,
        };
        assert_eq!(handle_adhoc(&app, &args).await.unwrap(), 0);
        assert_eq!(app.rich.history_len(), 1);
    }

    #[tokio::test]
    async fn test_adhoc_fail_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_for(dir.path(), &["-H", "r1"]);
        let args = AdhocArgs {
            module: "fail".to_string(),
            args: None,
            name: None,
            task_severity: None,
        };
        assert_eq!(handle_adhoc(&app, &args).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_adhoc_unknown_module() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_for(dir.path(), &[]);
        let args = AdhocArgs {
            module: "reboot".to_string(),
            args: None,
            name: None,
            task_severity: None,
        };
        let err = handle_adhoc(&app, &args).await.err().unwrap();
        assert!(matches!(err, CliError::Plan(_)));
    }

    #[tokio::test]
    async fn test_batch_runs_steps_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_for(dir.path(), &[]);
        let plan = dir.path().join("plan.yaml");
        std::fs::write(
            &plan,
            "tasks:\n  - name: first\n    module: echo_data\n    args: {a: 1}\n  - module: fail\n  - name: cleanup\n    module: echo_data\n    on_failed: true\n",
        )
        .unwrap();
        let code = handle_batch(&app, &BatchArgs { plan }).await.unwrap();
        assert_eq!(code, 1);
        assert_eq!(app.rich.history_len(), 3);
    }
}
