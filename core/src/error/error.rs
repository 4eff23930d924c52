use thiserror::Error;

use super::{FilterError, InventoryError, PlanError, RenderError, ResultError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),
    #[error("plan error: {0}")]
    Plan(#[from] PlanError),
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
    #[error("invalid result: {0}")]
    Result(#[from] ResultError),
    #[error("command failed: {0}")]
    Command(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot determine home directory")]
    NoHomeDir,
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
