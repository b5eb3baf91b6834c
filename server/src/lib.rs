//! Server context for the quarry game server.
//!
//! This crate owns the mutable server state: whether the server is running,
//! its tick rate, the loaded levels and the connected sessions. Incoming
//! batches are decoded with the [`wire`] crate under the configured limits.
//!
//! # Design Principles
//!
//! - **No globals** - All state lives in a [`ServerContext`]; several can coexist.
//! - **Bounded input** - Every batch is checked against [`wire::Limits`] before it is sliced.
//! - **Fail the session, not the server** - A malformed batch drops that peer only.

mod config;
mod context;
mod error;
mod level;
pub mod logging;
mod session;

pub use config::{ServerConfig, DEFAULT_TICK_RATE};
pub use context::{ServerContext, SERVER_NAME, SERVER_VERSION};
pub use error::{ServerError, ServerResult};
pub use level::{Level, LevelId};
pub use session::Session;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contexts_are_independent() {
        let mut first = ServerContext::new(ServerConfig::default()).unwrap();
        let mut second = ServerContext::new(ServerConfig::default()).unwrap();

        first.start();
        first.load_level("nether");
        first.tick();

        assert!(!second.is_running());
        assert_eq!(second.current_tick(), 0);
        assert!(!second.is_level_loaded("nether"));

        second.set_tick_rate(10).unwrap();
        assert_eq!(first.tick_rate(), DEFAULT_TICK_RATE);
    }
}
