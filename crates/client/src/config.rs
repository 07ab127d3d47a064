use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/analyze";

/// Environment variable that overrides the configured endpoint.
pub const ENDPOINT_ENV: &str = "MLREVIEW_ENDPOINT";

/// Connection settings for the analysis service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Full URL submissions are POSTed to
    pub endpoint: String,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: format!("mlreview/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|err| ClientError::invalid_config(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|err| ClientError::invalid_config(format!("{}: {err}", path.display())))
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Resolve the effective config: flag, then environment, then file, then defaults.
    pub fn resolve(
        flag: Option<&str>,
        env_value: Option<&str>,
        file: Option<&Path>,
    ) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        let override_endpoint = flag
            .or(env_value)
            .map(str::trim)
            .filter(|value| !value.is_empty());
        if let Some(endpoint) = override_endpoint {
            config.endpoint = endpoint.to_string();
        }
        Ok(config)
    }
}
