//! Next-round pairings and the options that shape them.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Two players meeting in the next round. `player_a` is the higher-ranked one.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub player_a: PlayerId,
    pub name_a: String,
    pub player_b: PlayerId,
    pub name_b: String,
}

impl Pairing {
    pub fn involves(&self, player: PlayerId) -> bool {
        self.player_a == player || self.player_b == player
    }
}

/// The player sitting out the next round when the player count is odd.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bye {
    pub player: PlayerId,
    pub name: String,
}

/// One round: pairings ordered top rank to bottom rank, plus an optional bye.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub pairings: Vec<Pairing>,
    pub bye: Option<Bye>,
}

impl Round {
    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty() && self.bye.is_none()
    }

    /// All player ids scheduled this round, pairings first, bye last.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = self
            .pairings
            .iter()
            .flat_map(|p| [p.player_a, p.player_b])
            .collect();
        if let Some(bye) = &self.bye {
            ids.push(bye.player);
        }
        ids
    }
}

/// Tournament rules the pairing engine can enforce.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PairingOptions {
    /// Look past the adjacent player when the adjacent pair already met.
    pub avoid_rematches: bool,
    /// Nobody receives a second bye before every player has had one.
    pub fair_byes: bool,
}

impl Default for PairingOptions {
    fn default() -> Self {
        Self {
            avoid_rematches: true,
            fair_byes: true,
        }
    }
}

impl PairingOptions {
    /// Plain adjacency: rank 1 vs 2, 3 vs 4, lowest-ranked player takes the bye.
    pub fn adjacent() -> Self {
        Self {
            avoid_rematches: false,
            fair_byes: false,
        }
    }
}
