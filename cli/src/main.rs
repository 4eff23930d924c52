use clap::Parser;
use richtask_cli::app::App;
use richtask_cli::commands::{cli, inventory, run};
use richtask_core::api::{get_richtask_data_dir, load_default, load_from, CliError, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = match args.config.as_deref() {
        Some(path) => load_from(path)?,
        None => load_default()?,
    };
    init_tracing(&cfg.logging).map_err(CliError::Command)?;

    let app = App::new(&args, cfg)?;
    let exit = match &args.command {
        cli::Commands::Inventory(inv_args) => inventory::handle_inventory(&app, inv_args)?,
        cli::Commands::Adhoc(adhoc_args) => run::handle_adhoc(&app, adhoc_args).await?,
        cli::Commands::Batch(batch_args) => run::handle_batch(&app, batch_args).await?,
    };
    app.finish(&args)?;
    Ok(exit)
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 1: at least one host failed (returned as a normal exit code, not as an error)
    // 11: config / filter / plan error
    // 20: inventory, IO or render error
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Filter(_) => 11,
        CliError::Plan(_) => 11,
        CliError::Inventory(_) => 20,
        CliError::Io(_) => 20,
        CliError::Render(_) => 20,
        CliError::Command(_) => 20,
        CliError::Result(_) => 50,
        CliError::Anyhow(_) => 50,
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => get_richtask_data_dir()
                .map(|d| d.join("logs"))
                .unwrap_or_else(|_| std::env::temp_dir().join("richtask")),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("richtask.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    // stdout belongs to the result tree.
    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
