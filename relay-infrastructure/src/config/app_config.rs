use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use relay_domain::RuntimeConfig;

use super::validation::{require_positive, validate_bind_addr};

pub const CONFIG_PATH_ENV: &str = "RELAY_CONFIG";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub send_timeout_ms: u64,
    pub outbound_buffer: usize,
    pub greeting: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let runtime = RuntimeConfig::default();
        Self {
            bind_addr: runtime.bind_addr,
            max_body_bytes: runtime.max_body_bytes,
            request_timeout_seconds: runtime.request_timeout_seconds,
            send_timeout_ms: runtime.send_timeout_ms,
            outbound_buffer: runtime.outbound_buffer,
            greeting: runtime.greeting,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            Self::from_toml(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| anyhow!("invalid config: {}", err))
    }

    pub fn normalize(&mut self) {
        self.bind_addr = self.bind_addr.trim().to_string();
        if self.greeting.trim().is_empty() {
            self.greeting = RuntimeConfig::default().greeting;
        }
        if self.request_timeout_seconds == 0 {
            self.request_timeout_seconds = 1;
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_bind_addr(&self.bind_addr)?;
        require_positive("max_body_bytes", self.max_body_bytes)?;
        require_positive("send_timeout_ms", self.send_timeout_ms)?;
        require_positive("outbound_buffer", self.outbound_buffer as u64)?;
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            send_timeout_ms: self.send_timeout_ms,
            outbound_buffer: self.outbound_buffer,
            greeting: self.greeting.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("RELAY_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("RELAY_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Some(value) = lookup("RELAY_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = lookup("RELAY_SEND_TIMEOUT_MS") {
            self.send_timeout_ms = value.parse().unwrap_or(self.send_timeout_ms);
        }
        if let Some(value) = lookup("RELAY_OUTBOUND_BUFFER") {
            self.outbound_buffer = value.parse().unwrap_or(self.outbound_buffer);
        }
        if let Some(value) = lookup("RELAY_GREETING") {
            self.greeting = value;
        }
    }
}
