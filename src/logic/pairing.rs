//! Swiss pairings: pair neighbours in the standings, assign a bye on odd counts.
//!
//! 1. Take the ranked standings from one snapshot of registry + ledger.
//! 2. Odd count: remove the bye holder (lowest-ranked, or lowest-ranked among those with
//!    the fewest byes when byes must be fair).
//! 3. Pair rank 1 with 2, 3 with 4, ... When rematches are avoided and a neighbour pair
//!    already met, look further down the standings; a bounded backtracking search finds a
//!    rematch-free round whenever one exists, and otherwise each player takes the nearest
//!    opponent they have not met, or the nearest one at all.

use crate::logic::ledger::opponents;
use crate::logic::standings::{compute_standings, Snapshot};
use crate::models::{Bye, Pairing, PairingOptions, PlayerId, Round, StandingRow, TournamentError};
use crate::store::RecordStore;
use std::collections::{HashMap, HashSet};

/// Candidate pairs tried by the rematch-free search before it gives up.
const SEARCH_BUDGET: usize = 100_000;

/// Already-met lookup.
type Faced = HashMap<PlayerId, HashSet<PlayerId>>;

/// Next round's pairings read from `store`.
pub fn swiss_pairings<S: RecordStore + ?Sized>(
    store: &S,
    options: PairingOptions,
) -> Result<Round, TournamentError> {
    let snapshot = Snapshot::take(store)?;
    let standings = compute_standings(&snapshot.players, &snapshot.matches, &snapshot.byes)?;
    let faced = opponents(&snapshot.matches);
    Ok(pair_round(&standings, &faced, options))
}

/// Pair ranked `standings` (as returned by the standings calculator).
///
/// `faced` maps each player to the opponents they have already played; it is only
/// consulted when `options.avoid_rematches` is set.
pub fn pair_round(standings: &[StandingRow], faced: &Faced, options: PairingOptions) -> Round {
    let mut pool: Vec<&StandingRow> = standings.iter().collect();

    let bye = if pool.len() % 2 == 1 {
        let row = pool.remove(bye_index(&pool, options.fair_byes));
        log::debug!("Bye goes to player {} ({} byes so far)", row.player, row.byes);
        Some(Bye {
            player: row.player,
            name: row.name.clone(),
        })
    } else {
        None
    };

    let ids: Vec<PlayerId> = pool.iter().map(|r| r.player).collect();
    let mut pairs = if options.avoid_rematches {
        rematch_free(&ids, faced).unwrap_or_else(|| {
            log::warn!("No rematch-free round exists; pairing nearest opponents");
            nearest_available(&ids, faced)
        })
    } else {
        (0..ids.len()).step_by(2).map(|i| (i, i + 1)).collect()
    };
    pairs.sort_unstable();

    let pairings: Vec<Pairing> = pairs
        .into_iter()
        .map(|(a, b)| Pairing {
            player_a: pool[a].player,
            name_a: pool[a].name.clone(),
            player_b: pool[b].player,
            name_b: pool[b].name.clone(),
        })
        .collect();
    log::debug!(
        "Paired {} players into {} pairings",
        pairings.len() * 2,
        pairings.len()
    );

    Round { pairings, bye }
}

fn bye_index(pool: &[&StandingRow], fair_byes: bool) -> usize {
    let last = pool.len() - 1;
    if !fair_byes {
        return last;
    }
    let fewest = pool.iter().map(|r| r.byes).min().unwrap_or(0);
    pool.iter().rposition(|r| r.byes == fewest).unwrap_or(last)
}

fn have_met(faced: &Faced, a: PlayerId, b: PlayerId) -> bool {
    faced.get(&a).map_or(false, |set| set.contains(&b))
}

/// Depth-first search for a round without rematches. Each player, top-down, tries the
/// nearest lower-ranked opponent first, so with no history this is plain adjacency.
fn rematch_free(ids: &[PlayerId], faced: &Faced) -> Option<Vec<(usize, usize)>> {
    let mut paired = vec![false; ids.len()];
    let mut pairs = Vec::with_capacity(ids.len() / 2);
    let mut budget = SEARCH_BUDGET;
    if search(ids, faced, &mut paired, &mut pairs, &mut budget) {
        Some(pairs)
    } else {
        None
    }
}

fn search(
    ids: &[PlayerId],
    faced: &Faced,
    paired: &mut [bool],
    pairs: &mut Vec<(usize, usize)>,
    budget: &mut usize,
) -> bool {
    let Some(i) = paired.iter().position(|p| !p) else {
        return true;
    };
    paired[i] = true;
    for j in i + 1..ids.len() {
        if paired[j] || have_met(faced, ids[i], ids[j]) {
            continue;
        }
        if *budget == 0 {
            break;
        }
        *budget -= 1;
        paired[j] = true;
        pairs.push((i, j));
        if search(ids, faced, paired, pairs, budget) {
            return true;
        }
        pairs.pop();
        paired[j] = false;
    }
    paired[i] = false;
    false
}

/// Greedy fallback: nearest opponent not yet met, else nearest remaining.
fn nearest_available(ids: &[PlayerId], faced: &Faced) -> Vec<(usize, usize)> {
    let mut paired = vec![false; ids.len()];
    let mut pairs = Vec::with_capacity(ids.len() / 2);
    while let Some(i) = paired.iter().position(|p| !p) {
        paired[i] = true;
        let mut open = (i + 1..ids.len()).filter(|&j| !paired[j]);
        let nearest = open.clone().next();
        let Some(j) = open.find(|&j| !have_met(faced, ids[i], ids[j])).or(nearest) else {
            break;
        };
        if have_met(faced, ids[i], ids[j]) {
            log::warn!("Rematch: player {} vs player {}", ids[i], ids[j]);
        }
        paired[j] = true;
        pairs.push((i, j));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faced_from(pairs: &[(PlayerId, PlayerId)]) -> Faced {
        let mut faced = Faced::new();
        for &(a, b) in pairs {
            faced.entry(a).or_default().insert(b);
            faced.entry(b).or_default().insert(a);
        }
        faced
    }

    #[test]
    fn search_without_history_is_adjacency() {
        let pairs = rematch_free(&[1, 2, 3, 4, 5, 6], &Faced::new()).unwrap();
        assert_eq!(pairs, vec![(0, 1), (2, 3), (4, 5)]);
    }

    #[test]
    fn search_backtracks_past_a_dead_end() {
        // Greedy would take 1-3 and strand 2-4, who already met.
        let faced = faced_from(&[(1, 2), (2, 4)]);
        let pairs = rematch_free(&[1, 2, 3, 4], &faced).unwrap();
        assert_eq!(pairs, vec![(0, 3), (1, 2)]);
    }

    #[test]
    fn search_fails_when_every_pairing_is_a_rematch() {
        let faced = faced_from(&[(1, 2)]);
        assert!(rematch_free(&[1, 2], &faced).is_none());
        assert_eq!(nearest_available(&[1, 2], &faced), vec![(0, 1)]);
    }
}
