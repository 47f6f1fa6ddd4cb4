//! Layered configuration.
//!
//! Sources are merged in order, later ones winning:
//!
//! 1. built-in defaults (the public guya.moe API),
//! 2. a configuration file (TOML, YAML or JSON, picked by extension),
//! 3. environment variables prefixed with `GUYA_`, using `__` to separate
//!    nested keys (`GUYA_HTTP__TIMEOUT_SECS=10`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

const ENV_PREFIX: &str = "GUYA_";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub media: MediaConfig,
    pub http: HttpConfig,
}

/// Where the JSON API lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, without a trailing slash. Endpoints are appended to it.
    pub base_url: String,
}
impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: "https://guya.moe/api".to_string() }
    }
}

/// Where cover and page images are served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub base_url: String,
}
impl Default for MediaConfig {
    fn default() -> Self {
        Self { base_url: "https://guya.moe".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout, in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
}
impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30, user_agent: concat!("guya/", env!("CARGO_PKG_VERSION")).to_string() }
    }
}
impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Default configuration file location for the current platform, e.g.
    /// `~/.config/guya/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("moe", "guya", "guya").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// The merged (but not yet extracted) configuration sources.
    ///
    /// With no `path`, the [default path](Self::default_path) is used. A file
    /// that doesn't exist contributes nothing.
    pub fn figment(path: Option<&Path>) -> Figment {
        let figment = Figment::from(Serialized::defaults(Config::default()));
        let figment = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => {
                debug!(path = %path.display(), "configuration file");
                match path.extension().and_then(OsStr::to_str) {
                    Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                    Some("json") => figment.merge(Json::file(path)),
                    _ => figment.merge(Toml::file(path)),
                }
            },
            None => figment,
        };
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate the configuration.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Config = Self::figment(path).extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            exn::bail!(ErrorKind::InvalidValue { field: "api.base_url", value: self.api.base_url.clone() });
        }
        if self.media.base_url.trim().is_empty() {
            exn::bail!(ErrorKind::InvalidValue { field: "media.base_url", value: self.media.base_url.clone() });
        }
        if self.http.timeout_secs == 0 {
            exn::bail!(ErrorKind::InvalidValue { field: "http.timeout_secs", value: "0".to_string() });
        }
        Ok(())
    }
}
