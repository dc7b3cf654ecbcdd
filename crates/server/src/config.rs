// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Server configuration
//!
//! Everything comes from `PROTOBUF_LSP_*` environment variables; the
//! defaults give a stdio server logging at `info`.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Top-level server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP listen address; `None` selects stdio transport
    pub address: Option<String>,
    /// TCP port, used when `address` is unset
    pub port: Option<u16>,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default tracing filter, overridable via `RUST_LOG`
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: None,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(address) = lookup("PROTOBUF_LSP_ADDRESS") {
            if !address.is_empty() {
                config.address = Some(address);
            }
        }
        if let Some(port) = lookup("PROTOBUF_LSP_PORT") {
            if !port.is_empty() {
                config.port = Some(port.parse().map_err(|_| ConfigError::InvalidValue {
                    name: "PROTOBUF_LSP_PORT",
                    value: port.clone(),
                })?);
            }
        }
        if let Some(level) = lookup("PROTOBUF_LSP_LOG_LEVEL") {
            if !level.is_empty() {
                config.log.level = level;
            }
        }

        Ok(config)
    }

    /// Address to listen on, or `None` for stdio transport
    pub fn listen_address(&self) -> Option<String> {
        if let Some(address) = &self.address {
            return Some(address.clone());
        }
        self.port.map(|port| format!("127.0.0.1:{port}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_to_stdio_and_info() {
        let config = from_vars(&[]).unwrap();
        assert!(config.listen_address().is_none());
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn explicit_address_wins_over_port() {
        let config = from_vars(&[
            ("PROTOBUF_LSP_ADDRESS", "0.0.0.0:9000"),
            ("PROTOBUF_LSP_PORT", "4389"),
        ])
        .unwrap();
        assert_eq!(config.listen_address().unwrap(), "0.0.0.0:9000");
    }

    #[test]
    fn port_alone_listens_on_loopback() {
        let config = from_vars(&[("PROTOBUF_LSP_PORT", "4389")]).unwrap();
        assert_eq!(config.listen_address().unwrap(), "127.0.0.1:4389");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = from_vars(&[("PROTOBUF_LSP_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn log_level_is_overridable() {
        let config = from_vars(&[("PROTOBUF_LSP_LOG_LEVEL", "debug")]).unwrap();
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let config = from_vars(&[
            ("PROTOBUF_LSP_ADDRESS", ""),
            ("PROTOBUF_LSP_LOG_LEVEL", ""),
        ])
        .unwrap();
        assert!(config.address.is_none());
        assert_eq!(config.log.level, "info");
    }
}
