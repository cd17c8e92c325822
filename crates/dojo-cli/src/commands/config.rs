use std::path::PathBuf;

use anyhow::{Context, Result};

use dojo_core::config::{Config, ConfigPaths};

/// Resolves `--config` against the default location and loads it.
pub fn load_effective(config_path: Option<PathBuf>) -> Result<Config> {
    let config_path = match config_path {
        Some(path) => return Config::load(&path),
        None => ConfigPaths::resolve()?.config_path,
    };
    Config::load_or_default(&config_path)
        .with_context(|| format!("load config {}", config_path.display()))
}

pub fn print_effective(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_effective(config_path)?;
    let output = config.to_toml_string()?;
    println!("{}", output);
    Ok(())
}
