//! Record store collaborator: where players, matches and byes live.
//!
//! The tournament logic never assumes a particular backend. A store only has to
//! insert records with a generated id, scan them all, and delete them all.

mod csv_file;
mod memory;

pub use csv_file::CsvStore;
pub use memory::{MemoryStore, Sequences};

use crate::models::{ByeRecord, MatchRecord, Player, PlayerId};
use chrono::{DateTime, Utc};

/// Failures from a store backend.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "store I/O error: {}", e),
            StoreError::Csv(e) => write!(f, "store CSV error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Csv(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        StoreError::Csv(e)
    }
}

/// Durable storage for the two record kinds the tournament owns (players, and the
/// ledger's matches and byes).
///
/// Ids are generated by the store and are never handed out twice, even after a delete.
/// Scans return records in insertion order.
pub trait RecordStore {
    fn insert_player(&mut self, name: &str) -> Result<Player, StoreError>;
    fn players(&self) -> Result<Vec<Player>, StoreError>;
    fn delete_players(&mut self) -> Result<(), StoreError>;

    fn insert_match(
        &mut self,
        player1: PlayerId,
        player2: PlayerId,
        winner: PlayerId,
        reported_at: DateTime<Utc>,
    ) -> Result<MatchRecord, StoreError>;
    fn matches(&self) -> Result<Vec<MatchRecord>, StoreError>;
    fn delete_matches(&mut self) -> Result<(), StoreError>;

    fn insert_bye(
        &mut self,
        player: PlayerId,
        reported_at: DateTime<Utc>,
    ) -> Result<ByeRecord, StoreError>;
    fn byes(&self) -> Result<Vec<ByeRecord>, StoreError>;
    fn delete_byes(&mut self) -> Result<(), StoreError>;

    /// Clear matches and byes. Backends that can write both in one step override this.
    fn delete_ledger(&mut self) -> Result<(), StoreError> {
        self.delete_matches()?;
        self.delete_byes()
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn insert_player(&mut self, name: &str) -> Result<Player, StoreError> {
        (**self).insert_player(name)
    }

    fn players(&self) -> Result<Vec<Player>, StoreError> {
        (**self).players()
    }

    fn delete_players(&mut self) -> Result<(), StoreError> {
        (**self).delete_players()
    }

    fn insert_match(
        &mut self,
        player1: PlayerId,
        player2: PlayerId,
        winner: PlayerId,
        reported_at: DateTime<Utc>,
    ) -> Result<MatchRecord, StoreError> {
        (**self).insert_match(player1, player2, winner, reported_at)
    }

    fn matches(&self) -> Result<Vec<MatchRecord>, StoreError> {
        (**self).matches()
    }

    fn delete_matches(&mut self) -> Result<(), StoreError> {
        (**self).delete_matches()
    }

    fn insert_bye(
        &mut self,
        player: PlayerId,
        reported_at: DateTime<Utc>,
    ) -> Result<ByeRecord, StoreError> {
        (**self).insert_bye(player, reported_at)
    }

    fn byes(&self) -> Result<Vec<ByeRecord>, StoreError> {
        (**self).byes()
    }

    fn delete_byes(&mut self) -> Result<(), StoreError> {
        (**self).delete_byes()
    }

    fn delete_ledger(&mut self) -> Result<(), StoreError> {
        (**self).delete_ledger()
    }
}
