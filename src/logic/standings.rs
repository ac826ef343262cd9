//! Standings: win/match aggregation over registry + ledger, ranked.

use crate::models::{
    ByeRecord, LedgerRef, MatchRecord, Player, PlayerId, StandingRow, TournamentError,
};
use crate::store::RecordStore;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Registry and ledger read together, so everything derived from it agrees.
pub(crate) struct Snapshot {
    pub players: Vec<Player>,
    pub matches: Vec<MatchRecord>,
    pub byes: Vec<ByeRecord>,
}

impl Snapshot {
    pub fn take<S: RecordStore + ?Sized>(store: &S) -> Result<Self, TournamentError> {
        Ok(Self {
            players: store.players()?,
            matches: store.matches()?,
            byes: store.byes()?,
        })
    }
}

/// Current standings read from `store`.
pub fn player_standings<S: RecordStore + ?Sized>(
    store: &S,
) -> Result<Vec<StandingRow>, TournamentError> {
    let snapshot = Snapshot::take(store)?;
    compute_standings(&snapshot.players, &snapshot.matches, &snapshot.byes)
}

/// Rank order: wins descending, then matches ascending, then player id ascending.
pub fn rank_order(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then(a.matches.cmp(&b.matches))
        .then(a.player.cmp(&b.player))
}

/// One row per player (players without matches included), sorted by [`rank_order`].
///
/// Each match adds a match to both participants and a win to the winner; each bye adds
/// a match, a win and a bye to its holder. A record naming an unregistered player is a
/// [`TournamentError::DataIntegrity`] error; a match between a player and themselves, or
/// whose winner did not play in it, is [`TournamentError::MalformedMatch`].
pub fn compute_standings(
    players: &[Player],
    matches: &[MatchRecord],
    byes: &[ByeRecord],
) -> Result<Vec<StandingRow>, TournamentError> {
    let mut rows: Vec<StandingRow> = players
        .iter()
        .map(|p| StandingRow {
            player: p.id,
            name: p.name.clone(),
            wins: 0,
            matches: 0,
            byes: 0,
        })
        .collect();
    let index: HashMap<PlayerId, usize> =
        players.iter().enumerate().map(|(i, p)| (p.id, i)).collect();

    for m in matches {
        if m.player1 == m.player2 || !(m.winner == m.player1 || m.winner == m.player2) {
            return Err(TournamentError::MalformedMatch(m.id));
        }
        let record = LedgerRef::Match(m.id);
        let row_of = |player: PlayerId| {
            index
                .get(&player)
                .copied()
                .ok_or(TournamentError::DataIntegrity { record, player })
        };
        let first = row_of(m.player1)?;
        let second = row_of(m.player2)?;
        let winner = row_of(m.winner)?;
        rows[first].matches += 1;
        rows[second].matches += 1;
        rows[winner].wins += 1;
    }

    for b in byes {
        let i = index
            .get(&b.player)
            .copied()
            .ok_or(TournamentError::DataIntegrity {
                record: LedgerRef::Bye(b.id),
                player: b.player,
            })?;
        rows[i].matches += 1;
        rows[i].wins += 1;
        rows[i].byes += 1;
    }

    rows.sort_by(rank_order);
    Ok(rows)
}
