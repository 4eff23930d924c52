use std::path::{Path, PathBuf};

use super::types::AppConfig;
use crate::error::ConfigError;
use crate::result::Severity;

const LOCAL_CONFIG: &str = "richtask.toml";

/// Get the default richtask data directory: ~/.richtask
pub fn get_richtask_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".richtask"))
        .ok_or(ConfigError::NoHomeDir)
}

/// Load configuration from an explicit file, then apply env overrides.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let mut cfg = read_file(path)?;
    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    Ok(cfg)
}

pub fn load_default() -> Result<AppConfig, ConfigError> {
    // Priority 1: ./richtask.toml (current directory)
    let local_config = Path::new(LOCAL_CONFIG);

    // Priority 2: ~/.richtask/config.toml
    let user_config = get_richtask_data_dir().ok().map(|d| d.join("config.toml"));

    let mut cfg = if local_config.exists() {
        read_file(local_config)?
    } else if let Some(path) = user_config.as_deref().filter(|p| p.exists()) {
        read_file(path)?
    } else {
        tracing::debug!("no config file found, using defaults");
        AppConfig::default()
    };

    // Environment variable overrides (Priority 0: highest)
    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    Ok(cfg)
}

fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let shown = path.display().to_string();
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: shown.clone(),
        source,
    })?;
    let cfg = toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: shown.clone(),
        source,
    })?;
    tracing::debug!(path = %shown, "config loaded");
    Ok(cfg)
}

/// Apply `RICHTASK_WIDTH` and `RICHTASK_SEVERITY`, read through `lookup`.
/// Blank values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("RICHTASK_WIDTH").filter(|v| !v.trim().is_empty()) {
        cfg.render.width = v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "RICHTASK_WIDTH",
                value: v.clone(),
            })?;
    }
    if let Some(v) = lookup("RICHTASK_SEVERITY").filter(|v| !v.trim().is_empty()) {
        cfg.render.severity_threshold =
            v.parse::<Severity>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "RICHTASK_SEVERITY",
                    value: v.clone(),
                })?;
    }
    Ok(())
}
