use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use richtask_core::api::{ExportFormat, Severity};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Text,
    Html,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => ExportFormat::Text,
            FormatArg::Html => ExportFormat::Html,
        }
    }
}

/// Run tasks against an inventory and print their results as a tree.
#[derive(Parser, Debug)]
#[command(name = "richtask", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file. Defaults to ./richtask.toml, then ~/.richtask/config.toml.
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Hosts file, overriding `inventory.hosts_file`.
    #[arg(short = 'i', long, global = true)]
    pub inventory: Option<PathBuf>,

    /// Comma-separated host names.
    #[arg(short = 'H', long, global = true)]
    pub hosts: Option<String>,

    /// Comma-separated group names.
    #[arg(short = 'g', long, global = true)]
    pub groups: Option<String>,

    /// Attribute filters: `key=value&key2=value2`, comma-separated.
    #[arg(short = 'k', long, global = true)]
    pub kwargs: Option<String>,

    /// Print the summary table after the run.
    #[arg(long, global = true)]
    pub summary: bool,

    /// Save everything printed to this file.
    #[arg(long, global = true)]
    pub write: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = FormatArg::Html, global = true)]
    pub format: FormatArg,

    /// Output width; 0 detects the terminal.
    #[arg(long, global = true)]
    pub width: Option<usize>,

    /// Hide leaves below this severity.
    #[arg(long, global = true)]
    pub severity: Option<Severity>,

    /// Comma-separated result fields to show (stdout,result,stderr,diff,exception,tests).
    #[arg(long, global = true)]
    pub fields: Option<String>,

    #[arg(long, global = true)]
    pub no_progress: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the (filtered) inventory.
    Inventory(InventoryArgs),
    /// Run one built-in task.
    Adhoc(AdhocArgs),
    /// Run the tasks of a YAML plan in order.
    Batch(BatchArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct InventoryArgs {
    /// Show passwords and other credentials.
    #[arg(short = 'p', long)]
    pub passwords: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AdhocArgs {
    /// Task module: echo_data, command or fail.
    #[arg(short = 'm', long)]
    pub module: String,

    /// Task arguments as `key=value,key2=value2`.
    #[arg(short = 'a', long)]
    pub args: Option<String>,

    /// Display name; defaults to the module.
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Severity level of the task itself.
    #[arg(long)]
    pub task_severity: Option<Severity>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct BatchArgs {
    pub plan: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adhoc_flags() {
        let args = Args::try_parse_from([
            "richtask", "-H", "r1,r2", "-g", "core", "--summary", "adhoc", "-m", "command",
            "-a", "command=uptime", "--severity", "warn",
        ])
        .unwrap();
        assert_eq!(args.hosts.as_deref(), Some("r1,r2"));
        assert_eq!(args.groups.as_deref(), Some("core"));
        assert!(args.summary);
        assert_eq!(args.severity, Some(Severity::Warning));
        assert_eq!(args.format, FormatArg::Html);
        match args.command {
            Commands::Adhoc(adhoc) => {
                assert_eq!(adhoc.module, "command");
                assert_eq!(adhoc.args.as_deref(), Some("command=uptime"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_inventory_passwords() {
        let args = Args::try_parse_from(["richtask", "inventory", "-p", "--format", "text"]).unwrap();
        assert!(matches!(args.command, Commands::Inventory(InventoryArgs { passwords: true })));
        assert_eq!(ExportFormat::from(args.format), ExportFormat::Text);
    }

    #[test]
    fn test_batch_requires_plan() {
        assert!(Args::try_parse_from(["richtask", "batch"]).is_err());
        let args = Args::try_parse_from(["richtask", "batch", "plan.yaml"]).unwrap();
        assert!(matches!(args.command, Commands::Batch(b) if b.plan == PathBuf::from("plan.yaml")));
    }
}
