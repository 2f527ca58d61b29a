//! Configuration file discovery and loading.
//!
//! An explicit `--config` path wins. Otherwise `vizaudit/config.toml` in the
//! working directory, then `config.toml` in the platform config directory,
//! is used when present. With no file, the built-in defaults apply.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use vizaudit::{AuditError, config::AppConfig};

const LOCAL_CONFIG: &str = "vizaudit/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse configuration file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl From<ConfigError> for AuditError {
    fn from(err: ConfigError) -> Self {
        AuditError::Config(err.to_string())
    }
}

/// Loads the configuration from `explicit_path`, or from the first file found
/// in the search locations.
///
/// # Errors
///
/// Returns `AuditError::Config` if the chosen file cannot be read or parsed.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, AuditError> {
    let path = match explicit_path {
        Some(path) => path.as_ref().to_path_buf(),
        None => match discover() {
            Some(path) => path,
            None => {
                debug!("No configuration file found, using default configuration");
                return Ok(AppConfig::default());
            }
        },
    };

    info!(path = path.display().to_string(); "Loading configuration");

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config = toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path,
        message: err.to_string(),
    })?;

    Ok(config)
}

/// Applies the hostname given on the command line, if any.
pub fn with_hostname_override(config: AppConfig, hostname: Option<&str>) -> AppConfig {
    match hostname {
        Some(hostname) => {
            debug!(hostname; "Hostname overridden from command line");
            config.with_hostname(hostname)
        }
        None => config,
    }
}

fn discover() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG);
    if local.is_file() {
        return Some(local);
    }

    let system = ProjectDirs::from("com", "gooddata", "vizaudit")?
        .config_dir()
        .join("config.toml");
    let found = system.is_file();
    debug!(path = system.display().to_string(), found; "Checked system configuration");
    found.then_some(system)
}
