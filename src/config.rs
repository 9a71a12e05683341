//! User configuration.
//!
//! An optional YAML file at `<config_dir>/todolist/config.yaml`:
//!
//! ```yaml
//! tasks_file: ~/notes/tasks.txt   # relative paths resolve against this file's directory
//! color: true
//! log_level: info
//! ```

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Backing file used when neither the command line nor the config names one
pub const DEFAULT_TASKS_FILE: &str = "tasks.txt";

const APP_DIR: &str = "todolist";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Location of the backing file
    pub tasks_file: Option<PathBuf>,
    /// Colorize terminal output
    pub color: bool,
    /// Default log verbosity (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_file: None,
            color: true,
            log_level: None,
        }
    }
}

/// Default config file location, if the platform has a config directory
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

impl Config {
    /// Load configuration
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(default) => match Self::from_file(&default) {
                    Ok(config) => Ok(config),
                    Err(e) if is_not_found(&e) => Ok(Self::default()),
                    Err(e) => Err(e),
                },
                None => Ok(Self::default()),
            },
        }
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;

        let mut config = Self::from_yaml(&content)
            .wrap_err_with(|| format!("Failed to parse config file {}", path.display()))?;

        if let Some(tasks_file) = config.tasks_file.take() {
            config.tasks_file = Some(resolve_relative(path, expand_home(tasks_file)));
        }

        Ok(config)
    }

    /// Parse config from YAML text. An empty document is the default config.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content).context("Invalid YAML")?;
        config.log_level()?;
        Ok(config)
    }

    /// Backing file: command line beats config beats [`DEFAULT_TASKS_FILE`]
    pub fn tasks_file(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.tasks_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TASKS_FILE))
    }

    pub fn log_level(&self) -> Result<Option<Level>> {
        self.log_level
            .as_deref()
            .map(|s| s.parse::<Level>().map_err(|_| eyre!("Invalid log_level: {}", s)))
            .transpose()
    }
}

fn is_not_found(err: &eyre::Report) -> bool {
    err.chain()
        .filter_map(|e| e.downcast_ref::<std::io::Error>())
        .any(|e| e.kind() == ErrorKind::NotFound)
}

fn expand_home(path: PathBuf) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path,
        },
        Err(_) => path,
    }
}

fn resolve_relative(config_path: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match config_path.parent() {
        Some(dir) => dir.join(path),
        None => path,
    }
}
