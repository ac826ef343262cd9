//! In-memory record store.

use crate::models::{ByeRecord, MatchRecord, Player, PlayerId};
use crate::store::{RecordStore, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last id handed out per record kind. Survives deletes so ids are never reused.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Sequences {
    pub player: u64,
    #[serde(rename = "match")]
    pub match_: u64,
    pub bye: u64,
}

impl Sequences {
    /// Raise every counter to at least the highest id present in the records.
    fn cover(&mut self, players: &[Player], matches: &[MatchRecord], byes: &[ByeRecord]) {
        if let Some(max) = players.iter().map(|p| p.id).max() {
            self.player = self.player.max(max);
        }
        if let Some(max) = matches.iter().map(|m| m.id).max() {
            self.match_ = self.match_.max(max);
        }
        if let Some(max) = byes.iter().map(|b| b.id).max() {
            self.bye = self.bye.max(max);
        }
    }
}

/// Vectors plus id counters. Also the working set of [`super::CsvStore`].
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    players: Vec<Player>,
    matches: Vec<MatchRecord>,
    byes: Vec<ByeRecord>,
    sequences: Sequences,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from previously persisted records.
    pub(crate) fn from_records(
        players: Vec<Player>,
        matches: Vec<MatchRecord>,
        byes: Vec<ByeRecord>,
        mut sequences: Sequences,
    ) -> Self {
        sequences.cover(&players, &matches, &byes);
        Self {
            players,
            matches,
            byes,
            sequences,
        }
    }

    pub(crate) fn player_slice(&self) -> &[Player] {
        &self.players
    }

    pub(crate) fn match_slice(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub(crate) fn bye_slice(&self) -> &[ByeRecord] {
        &self.byes
    }

    pub(crate) fn sequences(&self) -> Sequences {
        self.sequences
    }
}

impl RecordStore for MemoryStore {
    fn insert_player(&mut self, name: &str) -> Result<Player, StoreError> {
        self.sequences.player += 1;
        let player = Player::new(self.sequences.player, name);
        self.players.push(player.clone());
        Ok(player)
    }

    fn players(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.players.clone())
    }

    fn delete_players(&mut self) -> Result<(), StoreError> {
        self.players.clear();
        Ok(())
    }

    fn insert_match(
        &mut self,
        player1: PlayerId,
        player2: PlayerId,
        winner: PlayerId,
        reported_at: DateTime<Utc>,
    ) -> Result<MatchRecord, StoreError> {
        self.sequences.match_ += 1;
        let record = MatchRecord {
            id: self.sequences.match_,
            player1,
            player2,
            winner,
            reported_at,
        };
        self.matches.push(record.clone());
        Ok(record)
    }

    fn matches(&self) -> Result<Vec<MatchRecord>, StoreError> {
        Ok(self.matches.clone())
    }

    fn delete_matches(&mut self) -> Result<(), StoreError> {
        self.matches.clear();
        Ok(())
    }

    fn insert_bye(
        &mut self,
        player: PlayerId,
        reported_at: DateTime<Utc>,
    ) -> Result<ByeRecord, StoreError> {
        self.sequences.bye += 1;
        let record = ByeRecord {
            id: self.sequences.bye,
            player,
            reported_at,
        };
        self.byes.push(record.clone());
        Ok(record)
    }

    fn byes(&self) -> Result<Vec<ByeRecord>, StoreError> {
        Ok(self.byes.clone())
    }

    fn delete_byes(&mut self) -> Result<(), StoreError> {
        self.byes.clear();
        Ok(())
    }
}
