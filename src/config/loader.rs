// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;

/// Load a configuration file from a given path and return the raw `ConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (bounds, acyclicity). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {:?}", path))?;

    Ok(config)
}

/// Load a configuration file and run validation.
///
/// If the file does not exist *and* it is the default path, the built-in
/// defaults are used instead — the benchmark is runnable with nothing but
/// CLI flags. An explicitly given path that is missing is still an error.
pub fn load_and_validate(path: impl AsRef<Path>, explicit: bool) -> Result<ConfigFile> {
    let path = path.as_ref();

    let config = if !explicit && !path.exists() {
        ConfigFile::default()
    } else {
        load_from_path(path)?
    };

    validate_config(&config)?;
    Ok(config)
}

/// Default config path: `Taskfarm.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Taskfarm.toml")
}
