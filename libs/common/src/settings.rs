//! Server settings loaded with the `config` crate

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

/// Address a service listens on
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load `<PREFIX>_HOST` and `<PREFIX>_PORT`, falling back to `0.0.0.0:<default_port>`
    pub fn from_env(prefix: &str, default_port: u16) -> Result<Self> {
        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(default_port))?
            .add_source(Environment::with_prefix(prefix).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// `host:port` form for binding
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
