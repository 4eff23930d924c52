use std::path::{Path, PathBuf};
use std::sync::Arc;

use richtask_core::api::{
    filter_inventory, load_inventory, AppConfig, CliError, ConfigError, FilterParams, Inventory,
    Processors, ResultField, Runner,
};
use richtask_plugins::factory::build_processors;
use richtask_plugins::processors::RichResults;

use crate::commands::cli::Args;

/// Everything a command needs: config, the filtered inventory and the
/// processors results flow through.
pub struct App {
    pub config: AppConfig,
    pub inventory: Arc<Inventory>,
    pub rich: Arc<RichResults>,
    pub processors: Processors,
}

impl App {
    pub fn new(args: &Args, mut config: AppConfig) -> Result<Self, CliError> {
        apply_overrides(args, &mut config)?;

        let hosts_file = args
            .inventory
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.inventory.hosts_file));
        let defaults_file = config.inventory.defaults_file.as_deref().map(Path::new);
        let full = Arc::new(load_inventory(&hosts_file, defaults_file)?);

        let params = FilterParams {
            hosts: args.hosts.clone(),
            groups: args.groups.clone(),
            kwargs: args.kwargs.clone(),
        };
        let inventory = filter_inventory(&full, &params)?;
        tracing::debug!(
            hosts = inventory.len(),
            total = full.len(),
            file = %hosts_file.display(),
            "inventory ready"
        );

        let (rich, processors) = build_processors(&config.render);
        Ok(Self {
            config,
            inventory,
            rich,
            processors,
        })
    }

    pub fn runner(&self) -> Runner {
        Runner::new(
            self.config.runner.num_workers,
            Arc::new(self.processors.clone()),
        )
    }

    /// `--summary` and `--write`, in that order so the export includes the table.
    pub fn finish(&self, args: &Args) -> Result<(), CliError> {
        if args.summary {
            self.rich.summarize()?;
        }
        if let Some(path) = &args.write {
            self.rich.write(path, args.format.into())?;
        }
        Ok(())
    }
}

fn apply_overrides(args: &Args, config: &mut AppConfig) -> Result<(), CliError> {
    let render = &mut config.render;
    if let Some(width) = args.width {
        render.width = width;
    }
    if let Some(severity) = args.severity {
        render.severity_threshold = severity;
    }
    if let Some(fields) = args.fields.as_deref() {
        render.fields = ResultField::parse_list(fields).map_err(|_| ConfigError::InvalidValue {
            key: "fields",
            value: fields.to_string(),
        })?;
    }
    if args.no_progress {
        render.progress_bar = false;
    }
    Ok(())
}
