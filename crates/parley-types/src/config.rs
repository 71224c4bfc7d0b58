//! Server configuration for Parley.
//!
//! Deserialized from `config.toml` by the infra loader; every field has a
//! default so a missing or partial file still yields a runnable server.

use serde::Deserialize;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// SQLite database URL, e.g. `sqlite://parley.db?mode=rwc`.
    pub database_url: String,
    /// How long a long-poll request is held open with no new messages.
    pub long_poll_timeout_secs: u64,
    /// Lifetime of issued auth tokens.
    pub token_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: "sqlite://parley.db?mode=rwc".to_string(),
            long_poll_timeout_secs: 30,
            token_ttl_secs: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.long_poll_timeout_secs, 30);
        assert_eq!(config.token_ttl_secs, 3600);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ServerConfig = toml::from_str("port = 8080").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.long_poll_timeout_secs, 30);
    }
}
