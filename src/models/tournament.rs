//! Tournament facade and TournamentError.

use crate::logic::{ledger, pairing, registry, standings};
use crate::models::game::{ByeId, ByeRecord, MatchId, MatchRecord};
use crate::models::pairing::{PairingOptions, Round};
use crate::models::player::{Player, PlayerId};
use crate::models::standing::StandingRow;
use crate::store::{RecordStore, StoreError};

/// A ledger row, named in data-integrity errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LedgerRef {
    Match(MatchId),
    Bye(ByeId),
}

impl std::fmt::Display for LedgerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerRef::Match(id) => write!(f, "match {}", id),
            LedgerRef::Bye(id) => write!(f, "bye {}", id),
        }
    }
}

/// Errors that can occur during tournament operations.
#[derive(Debug)]
pub enum TournamentError {
    /// No registered player has this id.
    PlayerNotFound(PlayerId),
    /// No match record has this id.
    MatchNotFound(MatchId),
    /// A match was reported with the same player as winner and loser.
    SelfMatch(PlayerId),
    /// A match or bye was reported for a player who is not registered.
    UnknownPlayer(PlayerId),
    /// The ledger references a player missing from the registry.
    DataIntegrity { record: LedgerRef, player: PlayerId },
    /// A stored match pits a player against themselves or names a winner who did not play.
    MalformedMatch(MatchId),
    /// Players cannot be deleted while matches or byes still reference them.
    MatchesOutstanding,
    /// The record store failed.
    Store(StoreError),
}

impl TournamentError {
    /// Lookup by id found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TournamentError::PlayerNotFound(_) | TournamentError::MatchNotFound(_)
        )
    }

    /// The reported match (or bye) was rejected before touching the ledger.
    pub fn is_invalid_match(&self) -> bool {
        matches!(
            self,
            TournamentError::SelfMatch(_) | TournamentError::UnknownPlayer(_)
        )
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::PlayerNotFound(id) => write!(f, "Player {} not found", id),
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::SelfMatch(id) => {
                write!(f, "Player {} cannot play a match against themselves", id)
            }
            TournamentError::UnknownPlayer(id) => write!(f, "Player {} is not registered", id),
            TournamentError::DataIntegrity { record, player } => {
                write!(f, "{} references unregistered player {}", record, player)
            }
            TournamentError::MalformedMatch(id) => {
                write!(f, "Match {} does not have its winner among two distinct players", id)
            }
            TournamentError::MatchesOutstanding => {
                write!(f, "Delete matches before deleting players")
            }
            TournamentError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TournamentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TournamentError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for TournamentError {
    fn from(e: StoreError) -> Self {
        TournamentError::Store(e)
    }
}

/// One Swiss tournament over an injected record store.
///
/// Mutations take `&mut self` and reads take `&self`, so a caller sharing a
/// tournament between threads puts it behind a single lock; standings and pairings
/// are always computed from one snapshot of registry + ledger.
#[derive(Debug)]
pub struct Tournament<S> {
    store: S,
    options: PairingOptions,
}

impl<S: RecordStore> Tournament<S> {
    pub fn new(store: S, options: PairingOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> PairingOptions {
        self.options
    }

    pub fn set_options(&mut self, options: PairingOptions) {
        self.options = options;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Register a player (names need not be unique). Returns the new id.
    pub fn register_player(&mut self, name: &str) -> Result<PlayerId, TournamentError> {
        registry::register_player(&mut self.store, name).map(|p| p.id)
    }

    pub fn count_players(&self) -> Result<usize, TournamentError> {
        registry::count_players(&self.store)
    }

    pub fn player(&self, id: PlayerId) -> Result<Player, TournamentError> {
        registry::find_player(&self.store, id)
    }

    pub fn players(&self) -> Result<Vec<Player>, TournamentError> {
        Ok(self.store.players()?)
    }

    /// Record that `winner` beat `loser`.
    pub fn report_match(
        &mut self,
        winner: PlayerId,
        loser: PlayerId,
    ) -> Result<MatchRecord, TournamentError> {
        ledger::report_match(&mut self.store, winner, loser)
    }

    /// Record a bye (a win with no opponent) for `player`.
    pub fn report_bye(&mut self, player: PlayerId) -> Result<ByeRecord, TournamentError> {
        ledger::report_bye(&mut self.store, player)
    }

    pub fn matches_for(&self, player: PlayerId) -> Result<Vec<MatchRecord>, TournamentError> {
        ledger::matches_for(&self.store, player)
    }

    pub fn match_record(&self, id: MatchId) -> Result<MatchRecord, TournamentError> {
        ledger::find_match(&self.store, id)
    }

    /// Clear the ledger (matches and byes).
    pub fn delete_matches(&mut self) -> Result<(), TournamentError> {
        ledger::delete_matches(&mut self.store)
    }

    /// Clear the registry. Refused while the ledger still has rows.
    pub fn delete_players(&mut self) -> Result<(), TournamentError> {
        registry::delete_players(&mut self.store)
    }

    /// Clear ledger then registry.
    pub fn reset(&mut self) -> Result<(), TournamentError> {
        self.delete_matches()?;
        self.delete_players()?;
        log::info!("Tournament reset");
        Ok(())
    }

    /// Ranked standings: wins descending, then matches ascending, then player id.
    pub fn standings(&self) -> Result<Vec<StandingRow>, TournamentError> {
        standings::player_standings(&self.store)
    }

    /// Next round's pairings under this tournament's options.
    pub fn pairings(&self) -> Result<Round, TournamentError> {
        pairing::swiss_pairings(&self.store, self.options)
    }
}
