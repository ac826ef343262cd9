//! Player registry: registration, lookup, and the registry half of a reset.

use crate::models::{Player, PlayerId, TournamentError};
use crate::store::RecordStore;

/// Register a player under a fresh id. The name is stored as given; duplicates are allowed.
pub fn register_player<S: RecordStore + ?Sized>(
    store: &mut S,
    name: &str,
) -> Result<Player, TournamentError> {
    let player = store.insert_player(name)?;
    log::info!("Registered player {} ({})", player.id, player.name);
    Ok(player)
}

pub fn count_players<S: RecordStore + ?Sized>(store: &S) -> Result<usize, TournamentError> {
    Ok(store.players()?.len())
}

pub fn find_player<S: RecordStore + ?Sized>(
    store: &S,
    id: PlayerId,
) -> Result<Player, TournamentError> {
    store
        .players()?
        .into_iter()
        .find(|p| p.id == id)
        .ok_or(TournamentError::PlayerNotFound(id))
}

/// Remove every player. Refused while matches or byes exist, so the ledger can never
/// point at a deleted player through this path.
pub fn delete_players<S: RecordStore + ?Sized>(store: &mut S) -> Result<(), TournamentError> {
    if !store.matches()?.is_empty() || !store.byes()?.is_empty() {
        return Err(TournamentError::MatchesOutstanding);
    }
    store.delete_players()?;
    log::info!("Deleted all players");
    Ok(())
}
