//! Server config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use crate::error::ConfigError;

pub use schema::{AppConfig, BuildSection, SamplerSection, ServerSection};

pub fn load_from_file(path: &str) -> Result<AppConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AppConfig, ConfigError> {
    let cfg: AppConfig = serde_yaml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load the config file, or fall back to defaults when it does not exist.
/// Any other failure (unreadable file, bad yaml, failed validation) is still
/// an error; a present-but-broken config should never silently vanish.
pub fn load_or_default(path: &str) -> Result<AppConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io(e.to_string())),
    }
}
