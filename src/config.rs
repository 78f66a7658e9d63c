use crate::constant::DEFAULT_POLL_INTERVAL;
use crate::error::{Error, Result};

use serde::{Deserialize, Deserializer};

use std::time::Duration;

/// Connection settings for one projector
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Projector's host name or IP
    pub host: String,
    /// Name shown to users for the projector
    pub name: String,
    /// Time between poll cycles, given in whole seconds
    #[serde(default = "default_poll_interval", deserialize_with = "seconds")]
    pub poll_interval: Duration,
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(DEFAULT_POLL_INTERVAL)
}

fn seconds<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Duration::from_secs(u64::deserialize(deserializer)?))
}

impl Config {
    pub fn new<S: Into<String>>(host: S, name: S) -> Self {
        Self {
            host: host.into(),
            name: name.into(),
            poll_interval: default_poll_interval(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Read a config from json, e.g. `{"host": "192.168.0.20", "name": "Theater"}`
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::invalid_config("host is empty".into()));
        }
        if self.name.trim().is_empty() {
            return Err(Error::invalid_config("name is empty".into()));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::invalid_config("poll interval must be positive".into()));
        }
        Ok(())
    }
}
