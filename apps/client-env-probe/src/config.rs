//! Layered application configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use client_env_info::CollectorConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment variable prefix; `__` separates nested keys
/// (`ENVPROBE__LOGGING__LEVEL=debug`).
pub const ENV_PREFIX: &str = "ENVPROBE__";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub output: OutputConfig,
    pub host: HostConfig,
    pub collector: CollectorConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub pretty: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Replay this host snapshot (YAML or JSON) instead of probing the
    /// local machine
    pub snapshot: Option<PathBuf>,
}

/// Values from the command line that take precedence over every layer
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub snapshot: Option<PathBuf>,
    pub pretty: bool,
}

impl AppConfig {
    /// Layered config:
    /// 1) defaults -> 2) YAML (if provided) -> 3) env (`ENVPROBE__*`)
    ///
    /// # Errors
    /// When the file is missing or any layer does not match the schema.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    /// 4) CLI overrides
    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(snapshot) = &overrides.snapshot {
            self.host.snapshot = Some(snapshot.clone());
        }
        if overrides.pretty {
            self.output.pretty = true;
        }
    }
}
