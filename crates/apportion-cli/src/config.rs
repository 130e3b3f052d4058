use crate::cli::{MethodArg, OutputFormat};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "apportion.toml";

#[derive(Deserialize, Debug, Clone)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub method: MethodArg,
    #[serde(default = "default_divisor")]
    pub divisor: String,
    #[serde(default)]
    pub initial: i64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { method: MethodArg::default(), divisor: default_divisor(), initial: 0 }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter(), json: false }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ApportionConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the configuration came from, reported once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub found: bool,
}

impl ApportionConfig {
    /// Loads the configuration file.
    ///
    /// An explicit `path` must exist. Without one, `apportion.toml` in the
    /// working directory is tried and a missing file means built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let (config_path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        if !required && !config_path.exists() {
            return Ok((Self::default(), ConfigSource { path: config_path, found: false }));
        }

        let config_str = fs::read_to_string(&config_path).with_context(|| {
            format!("failed to read configuration file '{}'", config_path.display())
        })?;
        let config = Self::from_toml_str(&config_str).with_context(|| {
            format!("failed to parse configuration file '{}'", config_path.display())
        })?;
        Ok((config, ConfigSource { path: config_path, found: true }))
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// Applies `APPORTION_*` environment overrides.
    ///
    /// Values that do not parse are left out and returned so the caller can
    /// report them once logging is up.
    pub fn apply_env(self) -> (Self, Vec<IgnoredOverride>) {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> (Self, Vec<IgnoredOverride>) {
        let mut ignored = Vec::new();
        if let Some(method) = lookup("APPORTION_METHOD") {
            match <MethodArg as clap::ValueEnum>::from_str(&method, true) {
                Ok(method) => self.defaults.method = method,
                Err(_) => ignored.push(IgnoredOverride::new("APPORTION_METHOD", method)),
            }
        }
        if let Some(divisor) = lookup("APPORTION_DIVISOR") {
            self.defaults.divisor = divisor;
        }
        if let Some(format) = lookup("APPORTION_OUTPUT_FORMAT") {
            match <OutputFormat as clap::ValueEnum>::from_str(&format, true) {
                Ok(format) => self.output.format = format,
                Err(_) => ignored.push(IgnoredOverride::new("APPORTION_OUTPUT_FORMAT", format)),
            }
        }
        if let Some(filter) = lookup("APPORTION_LOG_FILTER") {
            self.logging.filter = filter;
        }
        (self, ignored)
    }
}

/// An environment override whose value was not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredOverride {
    pub variable: &'static str,
    pub value: String,
}

impl IgnoredOverride {
    fn new(variable: &'static str, value: String) -> Self {
        Self { variable, value }
    }
}

fn default_divisor() -> String {
    apportion_types::DEFAULT_DIVISOR.to_string()
}

fn default_log_filter() -> String {
    "apportion_core=info,apportion_cli=info".to_string()
}
