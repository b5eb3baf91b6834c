//! The server context: every piece of mutable server state lives here.
//!
//! There are no process-wide flags or counters. Each context owns its running
//! state, tick rate, level registry and session table, so several servers can
//! run side by side in one process.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::time::Duration;

use tracing::{debug, info, warn};
use wire::{decode_batch_packets, Packet, RawPacket, WireError};

use crate::config::{ServerConfig, DEFAULT_TICK_RATE};
use crate::error::{ServerError, ServerResult};
use crate::level::{Level, LevelId};
use crate::session::Session;

/// Product name reported in logs.
pub const SERVER_NAME: &str = "Quarry";

/// Server version.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug)]
pub struct ServerContext {
    config: ServerConfig,
    running: bool,
    tick_rate: u32,
    current_tick: u64,
    levels: BTreeMap<LevelId, Level>,
    next_level_id: u32,
    sessions: HashMap<SocketAddr, Session>,
}

impl ServerContext {
    /// Creates a stopped context from a validated configuration.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        Ok(Self {
            tick_rate: config.tick_rate,
            config,
            running: false,
            current_tick: 0,
            levels: BTreeMap::new(),
            next_level_id: 0,
            sessions: HashMap::new(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Marks the server running and loads the default level.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        info!(
            version = SERVER_VERSION,
            address = %self.config.bind_address(),
            "{SERVER_NAME} is now starting"
        );
        self.running = true;
        let level = self.default_level();
        info!(level = level.name(), id = %level.id(), "default level ready");
    }

    /// Stops the server and drops every session. Does nothing if not running.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        info!(
            ticks = self.current_tick,
            sessions = self.sessions.len(),
            "server is shutting down"
        );
        self.sessions.clear();
        self.running = false;
    }

    /// Number of ticks run since the context was created.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Advances every loaded level by one tick. Does nothing if not running.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.current_tick += 1;
        for level in self.levels.values_mut() {
            level.tick();
        }
    }

    #[must_use]
    pub const fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    pub fn set_tick_rate(&mut self, tick_rate: u32) -> ServerResult<()> {
        if tick_rate == 0 {
            return Err(ServerError::InvalidTickRate);
        }
        debug!(from = self.tick_rate, to = tick_rate, "tick rate changed");
        self.tick_rate = tick_rate;
        Ok(())
    }

    /// Restores the configured tick rate, or the default if none was configured.
    pub fn reset_tick_rate(&mut self) {
        self.tick_rate = if self.config.tick_rate == 0 {
            DEFAULT_TICK_RATE
        } else {
            self.config.tick_rate
        };
    }

    /// Time budget for a single tick at the current rate.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate
    }

    /// Loads a level by name, returning `false` if it is already loaded.
    pub fn load_level(&mut self, name: &str) -> bool {
        if self.is_level_loaded(name) {
            return false;
        }
        self.insert_level(name.to_owned());
        true
    }

    #[must_use]
    pub fn is_level_loaded(&self, name: &str) -> bool {
        self.find_level(name).is_some()
    }

    pub fn level_by_id(&self, id: LevelId) -> ServerResult<&Level> {
        self.levels.get(&id).ok_or(ServerError::UnknownLevel { id })
    }

    pub fn level_by_name(&self, name: &str) -> ServerResult<&Level> {
        self.find_level(name)
            .ok_or_else(|| ServerError::LevelNotLoaded {
                name: name.to_owned(),
            })
    }

    /// Returns the configured default level, loading it first if needed.
    pub fn default_level(&mut self) -> &Level {
        let name = self.config.default_level.clone();
        let existing = self.find_level(&name).map(Level::id);
        let id = match existing {
            Some(id) => id,
            None => self.insert_level(name),
        };
        &self.levels[&id]
    }

    /// Loaded levels in load order.
    pub fn loaded_levels(&self) -> impl Iterator<Item = &Level> {
        self.levels.values()
    }

    /// Opens a session for `addr`, returning `false` if one already exists.
    pub fn open_session(&mut self, addr: SocketAddr) -> ServerResult<bool> {
        if self.sessions.contains_key(&addr) {
            return Ok(false);
        }
        if self.sessions.len() >= self.config.max_players {
            return Err(ServerError::ServerFull {
                max_players: self.config.max_players,
            });
        }
        self.sessions
            .insert(addr, Session::new(addr, self.current_tick));
        info!(%addr, "session opened");
        Ok(true)
    }

    /// Removes a session, returning it if it existed.
    pub fn close_session(&mut self, addr: SocketAddr) -> Option<Session> {
        let session = self.sessions.remove(&addr);
        if session.is_some() {
            info!(%addr, "session closed");
        }
        session
    }

    #[must_use]
    pub fn session(&self, addr: SocketAddr) -> Option<&Session> {
        self.sessions.get(&addr)
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Decodes a batch received from `addr` into its packets.
    ///
    /// A batch that fails to decode makes the connection unusable: the
    /// session is discarded and [`ServerError::SessionDropped`] is returned.
    pub fn receive<'a>(
        &mut self,
        addr: SocketAddr,
        bytes: &'a [u8],
    ) -> ServerResult<Vec<RawPacket<'a>>> {
        let Some(session) = self.sessions.get_mut(&addr) else {
            return Err(ServerError::UnknownSession { addr });
        };
        match decode_batch_packets(bytes, &self.config.limits) {
            Ok(packets) => {
                session.record_batch(bytes.len(), packets.len());
                debug!(%addr, packets = packets.len(), bytes = bytes.len(), "batch received");
                Ok(packets)
            }
            Err(source) => Err(self.drop_session(addr, source, "malformed batch")),
        }
    }

    /// Decodes one packet received from `addr` as `P`.
    ///
    /// A body that fails to decode is fatal for the connection, exactly like a
    /// malformed batch: the session is discarded.
    pub fn decode<P: Packet>(
        &mut self,
        addr: SocketAddr,
        packet: &RawPacket<'_>,
    ) -> ServerResult<P> {
        if !self.sessions.contains_key(&addr) {
            return Err(ServerError::UnknownSession { addr });
        }
        packet
            .decode()
            .map_err(|source| self.drop_session(addr, source, "malformed packet"))
    }

    fn drop_session(&mut self, addr: SocketAddr, source: WireError, reason: &str) -> ServerError {
        self.sessions.remove(&addr);
        warn!(%addr, error = %source, "dropping session after {reason}");
        ServerError::SessionDropped { addr, source }
    }

    fn find_level(&self, name: &str) -> Option<&Level> {
        self.levels.values().find(|level| level.name() == name)
    }

    fn insert_level(&mut self, name: String) -> LevelId {
        let id = LevelId::new(self.next_level_id);
        self.next_level_id += 1;
        info!(level = %name, %id, "level loaded");
        self.levels.insert(id, Level::new(id, name));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ServerContext {
        let config = ServerConfig {
            log_file: None,
            max_players: 2,
            limits: wire::Limits::for_testing(),
            ..ServerConfig::default()
        };
        ServerContext::new(config).unwrap()
    }

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn new_context_is_stopped() {
        let ctx = context();
        assert!(!ctx.is_running());
        assert_eq!(ctx.tick_rate(), DEFAULT_TICK_RATE);
        assert_eq!(ctx.loaded_levels().count(), 0);
    }

    #[test]
    fn start_loads_default_level() {
        let mut ctx = context();
        ctx.start();
        assert!(ctx.is_running());
        assert!(ctx.is_level_loaded("world"));
        assert_eq!(ctx.level_by_name("world").unwrap().id().get(), 0);
    }

    #[test]
    fn start_twice_keeps_one_default_level() {
        let mut ctx = context();
        ctx.start();
        ctx.start();
        assert_eq!(ctx.loaded_levels().count(), 1);
    }

    #[test]
    fn tick_is_noop_when_stopped() {
        let mut ctx = context();
        ctx.load_level("lobby");
        ctx.tick();
        assert_eq!(ctx.current_tick(), 0);
        assert_eq!(ctx.level_by_name("lobby").unwrap().ticks(), 0);
    }

    #[test]
    fn tick_advances_every_level() {
        let mut ctx = context();
        ctx.start();
        ctx.load_level("nether");
        ctx.tick();
        ctx.tick();
        assert_eq!(ctx.current_tick(), 2);
        assert!(ctx.loaded_levels().all(|level| level.ticks() == 2));
    }

    #[test]
    fn shutdown_stops_and_clears_sessions() {
        let mut ctx = context();
        ctx.start();
        ctx.open_session(addr(1)).unwrap();
        ctx.shutdown();
        assert!(!ctx.is_running());
        assert_eq!(ctx.session_count(), 0);
        ctx.tick();
        assert_eq!(ctx.current_tick(), 0);
    }

    #[test]
    fn load_level_assigns_sequential_ids() {
        let mut ctx = context();
        assert!(ctx.load_level("a"));
        assert!(ctx.load_level("b"));
        assert!(!ctx.load_level("a"));
        assert_eq!(ctx.level_by_name("a").unwrap().id().get(), 0);
        assert_eq!(ctx.level_by_name("b").unwrap().id().get(), 1);
        let id = ctx.level_by_name("b").unwrap().id();
        assert_eq!(ctx.level_by_id(id).unwrap().name(), "b");
    }

    #[test]
    fn missing_levels_are_errors() {
        let ctx = context();
        assert!(matches!(
            ctx.level_by_name("void"),
            Err(ServerError::LevelNotLoaded { .. })
        ));
        assert!(matches!(
            ctx.level_by_id(LevelId::new(9)),
            Err(ServerError::UnknownLevel { .. })
        ));
    }

    #[test]
    fn tick_rate_controls() {
        let mut ctx = context();
        assert_eq!(ctx.tick_interval(), Duration::from_millis(50));
        ctx.set_tick_rate(40).unwrap();
        assert_eq!(ctx.tick_interval(), Duration::from_millis(25));
        assert!(matches!(
            ctx.set_tick_rate(0),
            Err(ServerError::InvalidTickRate)
        ));
        ctx.reset_tick_rate();
        assert_eq!(ctx.tick_rate(), DEFAULT_TICK_RATE);
    }

    #[test]
    fn sessions_respect_max_players() {
        let mut ctx = context();
        assert!(ctx.open_session(addr(1)).unwrap());
        assert!(!ctx.open_session(addr(1)).unwrap());
        assert!(ctx.open_session(addr(2)).unwrap());
        assert!(matches!(
            ctx.open_session(addr(3)),
            Err(ServerError::ServerFull { max_players: 2 })
        ));
        assert!(ctx.close_session(addr(1)).is_some());
        assert!(ctx.close_session(addr(1)).is_none());
        assert!(ctx.open_session(addr(3)).unwrap());
    }

    #[test]
    fn receive_requires_session() {
        let mut ctx = context();
        assert!(matches!(
            ctx.receive(addr(1), &[]),
            Err(ServerError::UnknownSession { .. })
        ));
    }

    #[test]
    fn receive_counts_packets() {
        let mut ctx = context();
        ctx.open_session(addr(1)).unwrap();
        let batch = [0x02, 0x05, 0xAA, 0x01, 0x06];
        let packets = ctx.receive(addr(1), &batch).unwrap();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].id, 0x05);
        assert_eq!(packets[1].id, 0x06);

        let session = ctx.session(addr(1)).unwrap();
        assert_eq!(session.batches_received(), 1);
        assert_eq!(session.packets_received(), 2);
        assert_eq!(session.bytes_received(), 5);
    }

    #[derive(Debug, PartialEq)]
    struct Flag(bool);

    impl Packet for Flag {
        const ID: u32 = 0x05;

        fn encode_body(&self, writer: &mut binary::ByteWriter) {
            writer.write_bool(self.0);
        }

        fn decode_body(cursor: &mut binary::ByteCursor<'_>) -> binary::BinaryResult<Self> {
            cursor.read_bool().map(Self)
        }
    }

    #[test]
    fn decode_keeps_session_on_success() {
        let mut ctx = context();
        ctx.open_session(addr(1)).unwrap();
        let packets = ctx.receive(addr(1), &[0x02, 0x05, 0x01]).unwrap();
        assert_eq!(ctx.decode::<Flag>(addr(1), &packets[0]).unwrap(), Flag(true));
        assert!(ctx.session(addr(1)).is_some());
    }

    #[test]
    fn malformed_packet_drops_session() {
        let mut ctx = context();
        ctx.open_session(addr(1)).unwrap();
        // A Flag with no body byte.
        let packets = ctx.receive(addr(1), &[0x01, 0x05]).unwrap();
        let err = ctx.decode::<Flag>(addr(1), &packets[0]).unwrap_err();
        assert!(matches!(err, ServerError::SessionDropped { .. }));
        assert!(ctx.session(addr(1)).is_none());
        assert!(matches!(
            ctx.decode::<Flag>(addr(1), &packets[0]),
            Err(ServerError::UnknownSession { .. })
        ));
    }

    #[test]
    fn malformed_batch_drops_session() {
        let mut ctx = context();
        ctx.open_session(addr(1)).unwrap();
        ctx.open_session(addr(2)).unwrap();

        let err = ctx.receive(addr(1), &[0x09, 0x01]).unwrap_err();
        assert!(matches!(err, ServerError::SessionDropped { .. }));
        assert!(ctx.session(addr(1)).is_none());
        assert!(ctx.session(addr(2)).is_some());
    }
}
