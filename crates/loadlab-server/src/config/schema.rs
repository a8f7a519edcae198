use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub sampler: SamplerSection,

    #[serde(default)]
    pub build: BuildSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            server: ServerSection::default(),
            sampler: SamplerSection::default(),
            build: BuildSection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::UnsupportedVersion);
        }
        self.sampler.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplerSection {
    /// Interval between system samples.
    #[serde(default = "default_sample_interval_ms")]
    pub interval_ms: u64,

    /// Blocking window over which CPU utilization is measured.
    #[serde(default = "default_cpu_window_ms")]
    pub cpu_window_ms: u64,
}

impl Default for SamplerSection {
    fn default() -> Self {
        Self {
            interval_ms: default_sample_interval_ms(),
            cpu_window_ms: default_cpu_window_ms(),
        }
    }
}

impl SamplerSection {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1000..=300_000).contains(&self.interval_ms) {
            return Err(ConfigError::Invalid(
                "sampler.interval_ms must be between 1000 and 300000".into(),
            ));
        }
        if !(100..=10_000).contains(&self.cpu_window_ms) {
            return Err(ConfigError::Invalid(
                "sampler.cpu_window_ms must be between 100 and 10000".into(),
            ));
        }
        if self.cpu_window_ms >= self.interval_ms {
            return Err(ConfigError::Invalid(
                "sampler.cpu_window_ms must be less than interval_ms".into(),
            ));
        }
        Ok(())
    }
}

/// Static build metadata exported as `app_build_info`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    #[serde(default = "default_build_version")]
    pub version: String,

    #[serde(default = "default_build_date")]
    pub build_date: String,

    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            version: default_build_version(),
            build_date: default_build_date(),
            environment: default_environment(),
        }
    }
}

fn default_version() -> u32 {
    1
}
fn default_listen() -> String {
    "0.0.0.0:5000".into()
}
fn default_sample_interval_ms() -> u64 {
    5000
}
fn default_cpu_window_ms() -> u64 {
    1000
}
fn default_build_version() -> String {
    env!("CARGO_PKG_VERSION").into()
}
fn default_build_date() -> String {
    "unknown".into()
}
fn default_environment() -> String {
    "development".into()
}
