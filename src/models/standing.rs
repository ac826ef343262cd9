//! Derived standings row.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

/// One player's record, recomputed from registry + ledger on every call.
///
/// `wins <= matches` always holds; byes count toward both.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub player: PlayerId,
    pub name: String,
    pub wins: u32,
    pub matches: u32,
    pub byes: u32,
}

impl StandingRow {
    pub fn losses(&self) -> u32 {
        self.matches.saturating_sub(self.wins)
    }
}
