//! Player identity.

use serde::{Deserialize, Serialize};

/// Unique identifier for a player (generated by the record store).
pub type PlayerId = u64;

/// A registered player. Identity never changes once created.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    /// Create a player with an id already assigned by the store.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
