//! Match ledger: append-only match and bye records.

use crate::models::{ByeRecord, MatchId, MatchRecord, PlayerId, TournamentError};
use crate::store::RecordStore;
use chrono::Utc;
use std::collections::{HashMap, HashSet};

/// Append one match: `winner` beat `loser`.
///
/// Both players must be registered and distinct; nothing is written otherwise.
pub fn report_match<S: RecordStore + ?Sized>(
    store: &mut S,
    winner: PlayerId,
    loser: PlayerId,
) -> Result<MatchRecord, TournamentError> {
    if winner == loser {
        return Err(TournamentError::SelfMatch(winner));
    }
    let players = store.players()?;
    for id in [winner, loser] {
        if !players.iter().any(|p| p.id == id) {
            return Err(TournamentError::UnknownPlayer(id));
        }
    }
    let record = store.insert_match(winner, loser, winner, Utc::now())?;
    log::info!(
        "Recorded match {}: player {} beat player {}",
        record.id,
        winner,
        loser
    );
    Ok(record)
}

/// Append a bye for a registered player.
pub fn report_bye<S: RecordStore + ?Sized>(
    store: &mut S,
    player: PlayerId,
) -> Result<ByeRecord, TournamentError> {
    if !store.players()?.iter().any(|p| p.id == player) {
        return Err(TournamentError::UnknownPlayer(player));
    }
    let record = store.insert_bye(player, Utc::now())?;
    log::info!("Recorded bye {} for player {}", record.id, player);
    Ok(record)
}

/// Matches `player` took part in, in insertion order.
pub fn matches_for<S: RecordStore + ?Sized>(
    store: &S,
    player: PlayerId,
) -> Result<Vec<MatchRecord>, TournamentError> {
    Ok(store
        .matches()?
        .into_iter()
        .filter(|m| m.involves(player))
        .collect())
}

pub fn find_match<S: RecordStore + ?Sized>(
    store: &S,
    id: MatchId,
) -> Result<MatchRecord, TournamentError> {
    store
        .matches()?
        .into_iter()
        .find(|m| m.id == id)
        .ok_or(TournamentError::MatchNotFound(id))
}

/// Clear matches and byes.
pub fn delete_matches<S: RecordStore + ?Sized>(store: &mut S) -> Result<(), TournamentError> {
    store.delete_ledger()?;
    log::info!("Deleted all matches and byes");
    Ok(())
}

/// Everyone each player has already faced.
pub fn opponents(matches: &[MatchRecord]) -> HashMap<PlayerId, HashSet<PlayerId>> {
    let mut faced: HashMap<PlayerId, HashSet<PlayerId>> = HashMap::new();
    for m in matches {
        faced.entry(m.player1).or_default().insert(m.player2);
        faced.entry(m.player2).or_default().insert(m.player1);
    }
    faced
}
