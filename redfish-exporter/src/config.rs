//! Exporter configuration
//!
//! Loaded from a YAML file, then overridden by `REDFISH_EXPORTER_*`
//! environment variables. A missing file is not an error: defaults plus
//! environment are enough to run against a single BMC.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "REDFISH_EXPORTER";
pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: String, value: String },
    #[error("missing required setting: {0}")]
    Missing(&'static str),
}

/// Where the settings came from, before environment overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// No file at the resolved path
    Defaults,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub host: HostConfig,
    pub log_level: String,
    pub web: WebConfig,
    pub scrape: ScrapeConfig,
    pub collectors: Vec<CollectorKind>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub basic_auth: bool,
    pub insecure_skip_verify: bool,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebConfig {
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapeConfig {
    pub timeout_seconds: u64,
    pub max_concurrency: usize,
}

/// Subsystem collectors that can be switched on per deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectorKind {
    Basic,
    /// Temperatures and fans
    Thermal,
    Power,
    Network,
}

impl CollectorKind {
    pub const ALL: [CollectorKind; 4] = [
        CollectorKind::Basic,
        CollectorKind::Thermal,
        CollectorKind::Power,
        CollectorKind::Network,
    ];
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: HostConfig::default(),
            log_level: "info".to_string(),
            web: WebConfig::default(),
            scrape: ScrapeConfig::default(),
            collectors: CollectorKind::ALL.to_vec(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            username: String::new(),
            password: String::new(),
            basic_auth: false,
            insecure_skip_verify: true,
            request_timeout_seconds: 10,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            port: 9610,
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_concurrency: 16,
        }
    }
}

impl WebConfig {
    /// `address:port`, with an empty address meaning all interfaces
    pub fn listen_address(&self) -> String {
        let address = if self.address.is_empty() { "0.0.0.0" } else { &self.address };
        format!("{}:{}", address, self.port)
    }
}

impl HostConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl ScrapeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    /// Resolve the config path: explicit flag, then env, then default
    pub fn resolve_path(cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| std::env::var_os(format!("{ENV_PREFIX}_CONFIG")).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load file + process environment, then validate.
    ///
    /// Runs before logging is set up, so the caller reports the source.
    pub fn load(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    fn load_with<F>(path: &Path, lookup: F) -> Result<(Self, ConfigSource), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (mut config, source) = match Self::from_file(path)? {
            Some(config) => (config, ConfigSource::File),
            None => (Self::default(), ConfigSource::Defaults),
        };
        config.apply_env(lookup)?;
        config.validate()?;
        Ok((config, source))
    }

    /// `None` when the file does not exist
    fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map(Some)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Apply `REDFISH_EXPORTER_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |suffix: &str| {
            let key = format!("{ENV_PREFIX}_{suffix}");
            lookup(&key).map(|value| (key, value))
        };

        if let Some((_, v)) = get("HOST_ENDPOINT") {
            self.host.endpoint = v;
        }
        if let Some((_, v)) = get("HOST_USERNAME") {
            self.host.username = v;
        }
        if let Some((_, v)) = get("HOST_PASSWORD") {
            self.host.password = v;
        }
        if let Some((key, v)) = get("HOST_BASIC_AUTH") {
            self.host.basic_auth = parse(&key, &v)?;
        }
        if let Some((_, v)) = get("LOG_LEVEL") {
            self.log_level = v;
        }
        if let Some((_, v)) = get("WEB_ADDRESS") {
            self.web.address = v;
        }
        if let Some((key, v)) = get("WEB_PORT") {
            self.web.port = parse(&key, &v)?;
        }
        if let Some((key, v)) = get("SCRAPE_TIMEOUT_SECONDS") {
            self.scrape.timeout_seconds = parse(&key, &v)?;
        }
        if let Some((key, v)) = get("SCRAPE_MAX_CONCURRENCY") {
            self.scrape.max_concurrency = parse(&key, &v)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.endpoint.trim().is_empty() {
            return Err(ConfigError::Missing("host.endpoint"));
        }
        if self.scrape.max_concurrency == 0 {
            return Err(ConfigError::Invalid {
                key: "scrape.maxConcurrency".into(),
                value: "0".into(),
            });
        }
        if self.scrape.timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                key: "scrape.timeoutSeconds".into(),
                value: "0".into(),
            });
        }
        if self.collectors.is_empty() {
            return Err(ConfigError::Missing("collectors"));
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    })
}
