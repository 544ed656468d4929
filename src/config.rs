use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Service settings, read from a JSON file. Missing fields take their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub default_capacity: usize,
    /// Room limit used when a generate request asks for 0 rooms or none at all.
    pub default_room_limit: usize,
    pub default_start_room_code: String,
    /// env_logger filter applied when RUST_LOG is unset.
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            default_capacity: 90,
            default_room_limit: 999,
            default_start_room_code: "MC101".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn room_limit_or_default(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(0) | None => self.default_room_limit,
            Some(rooms) => rooms,
        }
    }
}

pub fn read_config(path: &Path) -> Result<ServiceConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config at {}", path.display()))
}
