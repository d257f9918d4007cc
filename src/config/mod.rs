pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".relay-ctl.toml";

/// Get the global config file path (~/.relay-ctl.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (./.relay-ctl.toml)
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load configuration from file or use defaults
///
/// An explicitly given file must exist and parse. Otherwise the local config
/// is checked first, then the global config.
pub fn load_config(explicit: Option<&Path>) -> Result<types::Config> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        return parse_config_file(path);
    }

    let candidates = std::env::current_dir()
        .ok()
        .map(|d| local_config_path(&d))
        .into_iter()
        .chain(global_config_path());

    for candidate in candidates {
        if !candidate.exists() {
            continue;
        }
        match parse_config_file(&candidate) {
            Ok(config) => {
                log::debug!("Loaded configuration from {}", candidate.display());
                return Ok(config);
            }
            Err(e) => log::warn!("Ignoring {}: {}", candidate.display(), e),
        }
    }

    Ok(types::Config::default())
}

fn parse_config_file(path: &Path) -> Result<types::Config> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| ConfigError::ParsingFailed(format!("{}: {}", path.display(), e)).into())
}
