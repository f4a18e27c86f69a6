//! Type-safe identifier wrapper around [`Uuid`].
//!
//! Worlds are looked up by identity, never by name: two differently loaded
//! world instances may share a name, but each load gets a fresh [`WorldId`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identity of one loaded world instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorldId(pub Uuid);

impl WorldId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for WorldId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for WorldId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for WorldId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<WorldId> for Uuid {
    fn from(id: WorldId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        assert_ne!(WorldId::new(), WorldId::new());
    }

    #[test]
    fn uuid_round_trip_preserves_identity() {
        let id = WorldId::new();
        let raw: Uuid = id.into();
        assert_eq!(WorldId::from(raw), id);
        assert_eq!(id.to_string(), raw.to_string());
    }
}
