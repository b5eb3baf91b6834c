//! Error types for the server context.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use wire::WireError;

use crate::level::LevelId;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to read config {}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config")]
    ParseConfig(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    #[error("tick rate must be nonzero")]
    InvalidTickRate,

    #[error("level `{name}` is not loaded")]
    LevelNotLoaded { name: String },

    #[error("level {id} is not loaded")]
    UnknownLevel { id: LevelId },

    #[error("server is full ({max_players} players)")]
    ServerFull { max_players: usize },

    #[error("no session for {addr}")]
    UnknownSession { addr: SocketAddr },

    /// A batch from this peer failed to decode; its session was discarded.
    #[error("session {addr} dropped")]
    SessionDropped {
        addr: SocketAddr,
        #[source]
        source: WireError,
    },

    #[error("failed to open log file {}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to install log subscriber: {0}")]
    LogInit(String),
}
