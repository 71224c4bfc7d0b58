//! Server configuration loader for Parley.
//!
//! Reads a TOML file into [`ServerConfig`], falling back to defaults when
//! the file is missing or malformed. `PARLEY_DATABASE_URL` overrides the
//! database URL from any source.

use std::path::Path;

use parley_types::config::ServerConfig;

/// Load configuration from `path`, or defaults when it is unusable.
///
/// - Missing file: returns [`ServerConfig::default()`] quietly.
/// - Unreadable or unparsable file: logs a warning and returns the default.
/// - `PARLEY_DATABASE_URL` env var, when set, wins over the file value.
pub async fn load_config(path: &Path) -> ServerConfig {
    let mut config = match tokio::fs::read_to_string(path).await {
        Ok(content) => match toml::from_str::<ServerConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
                ServerConfig::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            ServerConfig::default()
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            ServerConfig::default()
        }
    };

    if let Ok(url) = std::env::var("PARLEY_DATABASE_URL") {
        config.database_url = url;
    }

    config
}
