//! Configuration for Bucketwatch

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Environment variable pointing at a TOML config file
pub const CONFIG_PATH_ENV: &str = "BUCKETWATCH_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketwatchConfig {
    #[serde(default)]
    pub naming: NamingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub probe: ProbeConfig,
}

impl BucketwatchConfig {
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::InvalidConfig(format!("Failed to read config {:?}: {}", path, e))
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::Error::InvalidConfig(format!("Failed to parse config: {}", e)))
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(suffix) = std::env::var("BUCKETWATCH_STACK_SUFFIX") {
            config.naming.stack_suffix = suffix;
        }
        if let Ok(level) = std::env::var("BUCKETWATCH_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("BUCKETWATCH_LOG_FORMAT") {
            config.logging.format = format;
        }
        if let Ok(quoted) = std::env::var("BUCKETWATCH_QUOTED_UNKNOWN") {
            config.logging.quoted_unknown = quoted == "true";
        }

        // Probe from environment
        if let Ok(enabled) = std::env::var("BUCKETWATCH_PROBE_ENABLED") {
            config.probe.enabled = enabled != "false";
        }
        if let Ok(url) = std::env::var("BUCKETWATCH_PROBE_URL") {
            config.probe.url = url;
        }
        if let Ok(timeout) = std::env::var("BUCKETWATCH_PROBE_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                config.probe.timeout_secs = secs;
            }
        }

        config
    }

    /// Load from the file named by `BUCKETWATCH_CONFIG`, or from the environment
    pub fn load() -> crate::Result<Self> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                debug!("Loading configuration from {}", path);
                Self::from_file(&path)?
            }
            Err(_) => Self::from_env(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.naming.validate()?;
        self.logging.validate()?;
        self.probe.validate()
    }
}

/// Static resource naming
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Suffix appended to every resource name and construct id
    pub stack_suffix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            stack_suffix: crate::DEFAULT_STACK_SUFFIX.to_string(),
        }
    }
}

impl NamingConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.stack_suffix.trim().is_empty() {
            return Err(crate::Error::InvalidConfig(
                "naming.stack_suffix must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "json" or "pretty"
    pub format: String,
    /// Render unclassified operations as the legacy `"UNKNOWN OPERATION"` label
    pub quoted_unknown: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
            quoted_unknown: false,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> crate::Result<()> {
        match self.format.as_str() {
            "json" | "pretty" => Ok(()),
            other => Err(crate::Error::InvalidConfig(format!(
                "Unknown log format: {} (expected json or pretty)",
                other
            ))),
        }
    }
}

/// Package probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Run the probe after every invocation
    pub enabled: bool,
    /// Page whose title is fetched
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: crate::DEFAULT_PROBE_URL.to_string(),
            timeout_secs: crate::DEFAULT_PROBE_TIMEOUT_SECS,
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.timeout_secs == 0 {
            return Err(crate::Error::InvalidConfig(
                "probe.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.enabled && self.url.is_empty() {
            return Err(crate::Error::InvalidConfig(
                "probe enabled but probe.url not specified".into(),
            ));
        }
        Ok(())
    }
}
