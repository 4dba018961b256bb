//! Service Configuration Module
//!
//! Loads typed service configuration from TOML files with environment-specific
//! overrides and `OBSCAN_` environment variables on top.

use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Prefix for environment variable overrides (`OBSCAN_SCAN__CANDLE_LIMIT=500`)
pub const ENV_PREFIX: &str = "OBSCAN";

/// Pick the configuration file: `$env_var` when set, otherwise `default`
pub fn resolve_config_path(env_var: &str, default: &str) -> PathBuf {
    match std::env::var(env_var) {
        Ok(path) if !path.trim().is_empty() => {
            debug!("Using config path from {}: {}", env_var, path);
            PathBuf::from(path)
        }
        _ => PathBuf::from(default),
    }
}

/// Load configuration with the default `OBSCAN` variable prefix
pub fn load_config<T: DeserializeOwned>(base_path: &Path, environment: Option<&str>) -> Result<T> {
    load_layered(base_path, environment, ENV_PREFIX)
}

/// Load `base_path`, then `environments/<environment>.toml` next to it (when
/// present), then `<prefix>_*` environment variables with `__` as the nesting
/// separator.
pub fn load_layered<T: DeserializeOwned>(
    base_path: &Path,
    environment: Option<&str>,
    env_prefix: &str,
) -> Result<T> {
    let mut builder = Config::builder().add_source(File::from(base_path).required(true));

    if let Some(env) = environment {
        let env_file = base_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("environments")
            .join(format!("{}.toml", env));

        if env_file.exists() {
            info!("Loading environment config: {:?}", env_file);
            builder = builder.add_source(File::from(env_file.as_path()));
        } else {
            warn!("Environment config not found: {:?}", env_file);
        }
    }

    builder = builder.add_source(
        Environment::with_prefix(env_prefix)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .with_context(|| format!("Failed to build configuration from {:?}", base_path))?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// Expand `${VAR}` / `$VAR` references, typically for secrets kept out of files
pub fn expand_env(value: &str) -> Result<String> {
    let expanded = shellexpand::env(value)
        .with_context(|| format!("Failed to expand environment reference in '{}'", value))?;
    Ok(expanded.into_owned())
}
