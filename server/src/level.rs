//! Loaded levels tracked by the server context.

use std::fmt;

/// Identifier assigned to a level when it is loaded.
///
/// Ids are handed out by the owning [`ServerContext`](crate::ServerContext)
/// in load order, starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelId(u32);

impl LevelId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A loaded level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    id: LevelId,
    name: String,
    ticks: u64,
}

impl Level {
    pub(crate) fn new(id: LevelId, name: String) -> Self {
        Self { id, name, ticks: 0 }
    }

    #[must_use]
    pub const fn id(&self) -> LevelId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of ticks this level has run since it was loaded.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(crate) fn tick(&mut self) {
        self.ticks += 1;
    }
}
