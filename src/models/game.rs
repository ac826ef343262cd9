//! Ledger records: played matches and byes.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a match record.
pub type MatchId = u64;

/// Unique identifier for a bye record.
pub type ByeId = u64;

/// One reported match. `player1` is the winner and `player2` the loser, as reported.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub player1: PlayerId,
    pub player2: PlayerId,
    /// Always one of `player1` / `player2`.
    pub winner: PlayerId,
    pub reported_at: DateTime<Utc>,
}

impl MatchRecord {
    /// Whether `player` took part in this match.
    pub fn involves(&self, player: PlayerId) -> bool {
        self.player1 == player || self.player2 == player
    }

    /// The losing participant.
    pub fn loser(&self) -> PlayerId {
        if self.winner == self.player1 {
            self.player2
        } else {
            self.player1
        }
    }

    /// The other participant, if `player` took part.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        if self.player1 == player {
            Some(self.player2)
        } else if self.player2 == player {
            Some(self.player1)
        } else {
            None
        }
    }
}

/// A bye granted to a player for one round. Counts as a win with no opponent.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ByeRecord {
    pub id: ByeId,
    pub player: PlayerId,
    pub reported_at: DateTime<Utc>,
}
