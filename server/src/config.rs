//! Server configuration loaded from TOML.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wire::Limits;

use crate::error::{ServerError, ServerResult};

/// Default number of ticks per second.
pub const DEFAULT_TICK_RATE: u32 = 20;

/// Server configuration.
///
/// Every field has a default, so a partial file (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server_name: String,
    pub address: String,
    pub port: u16,
    pub max_players: usize,
    pub motd: String,
    /// Level loaded on start.
    pub default_level: String,
    /// Enables `debug` level logging unless `RUST_LOG` says otherwise.
    pub debug_mode: bool,
    pub tick_rate: u32,
    /// Log file appended to by the background writer. `None` disables file logging.
    pub log_file: Option<PathBuf>,
    /// Lines buffered before logging callers block.
    pub log_queue_capacity: usize,
    /// Decode limits applied to every incoming batch.
    pub limits: Limits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_name: "Quarry Server".to_owned(),
            address: "0.0.0.0".to_owned(),
            port: 19132,
            max_players: 20,
            motd: "A Quarry server".to_owned(),
            default_level: "world".to_owned(),
            debug_mode: false,
            tick_rate: DEFAULT_TICK_RATE,
            log_file: Some(PathBuf::from("quarry.log")),
            log_queue_capacity: 1024,
            limits: Limits::default(),
        }
    }
}

impl ServerConfig {
    /// Reads and validates a configuration file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ServerError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.tick_rate == 0 {
            return Err(ServerError::InvalidConfig("tick_rate must be nonzero"));
        }
        if self.log_queue_capacity == 0 {
            return Err(ServerError::InvalidConfig(
                "log_queue_capacity must be nonzero",
            ));
        }
        if self.default_level.is_empty() {
            return Err(ServerError::InvalidConfig("default_level must not be empty"));
        }
        Ok(())
    }

    /// Returns the `address:port` pair to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.tick_rate, DEFAULT_TICK_RATE);
    }

    #[test]
    fn partial_file_overrides_fields() {
        let config = ServerConfig::from_toml_str(
            r#"
            server_name = "Test"
            port = 25565
            debug_mode = true

            [limits]
            max_packets = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.server_name, "Test");
        assert_eq!(config.bind_address(), "0.0.0.0:25565");
        assert!(config.debug_mode);
        assert_eq!(config.limits.max_packets, 4);
        assert_eq!(
            config.limits.max_packet_len,
            Limits::default().max_packet_len
        );
    }

    #[test]
    fn example_file_matches_defaults() {
        let config = ServerConfig::from_toml_str(include_str!("../../quarry.example.toml")).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let err = ServerConfig::from_toml_str("tick_rate = 0").unwrap_err();
        assert!(matches!(err, ServerError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = ServerConfig::from_toml_str("port = \"high\"").unwrap_err();
        assert!(matches!(err, ServerError::ParseConfig(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "motd = \"hello\"").unwrap();
        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.motd, "hello");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServerConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ServerError::ReadConfig { .. }));
    }
}
