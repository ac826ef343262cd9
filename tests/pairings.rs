//! Integration tests for Swiss pairings: coverage, adjacency, byes, rematches.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use swiss_tournament::{MemoryStore, PairingOptions, PlayerId, Round, Tournament};

fn tournament_with_players(
    n: usize,
    options: PairingOptions,
) -> (Tournament<MemoryStore>, Vec<PlayerId>) {
    let mut t = Tournament::new(MemoryStore::new(), options);
    let ids = (0..n)
        .map(|i| t.register_player(&format!("P{i}")).unwrap())
        .collect();
    (t, ids)
}

fn pair_set(round: &Round) -> HashSet<[PlayerId; 2]> {
    round
        .pairings
        .iter()
        .map(|p| {
            let mut pair = [p.player_a, p.player_b];
            pair.sort_unstable();
            pair
        })
        .collect()
}

/// Play a round: the higher-ranked player wins unless `rng` says otherwise; record any bye.
fn play(t: &mut Tournament<MemoryStore>, round: &Round, rng: &mut StdRng) {
    for p in &round.pairings {
        if rng.gen_bool(0.5) {
            t.report_match(p.player_a, p.player_b).unwrap();
        } else {
            t.report_match(p.player_b, p.player_a).unwrap();
        }
    }
    if let Some(bye) = &round.bye {
        t.report_bye(bye.player).unwrap();
    }
}

#[test]
fn no_players_no_pairings() {
    let (t, _) = tournament_with_players(0, PairingOptions::default());
    let round = t.pairings().unwrap();
    assert!(round.is_empty());
}

#[test]
fn single_player_gets_the_bye() {
    let (t, ids) = tournament_with_players(1, PairingOptions::default());
    let round = t.pairings().unwrap();
    assert!(round.pairings.is_empty());
    assert_eq!(round.bye.unwrap().player, ids[0]);
}

#[test]
fn even_counts_pair_everyone_once() {
    for n in (2..=16).step_by(2) {
        let (t, ids) = tournament_with_players(n, PairingOptions::default());
        let round = t.pairings().unwrap();

        assert_eq!(round.pairings.len(), n / 2);
        assert!(round.bye.is_none());
        let mut seen = round.player_ids();
        seen.sort_unstable();
        assert_eq!(seen, ids);
    }
}

#[test]
fn one_win_players_meet_each_other() {
    let (mut t, ids) = tournament_with_players(4, PairingOptions::default());
    let [a, b, c, d] = [ids[0], ids[1], ids[2], ids[3]];
    t.report_match(a, b).unwrap();
    t.report_match(c, d).unwrap();

    let round = t.pairings().unwrap();

    let expected: HashSet<[PlayerId; 2]> = [[a, c], [b, d]].into_iter().collect();
    assert_eq!(pair_set(&round), expected);
    // Top of the standings comes first.
    assert_eq!(round.pairings[0].player_a, a);
    assert_eq!(round.pairings[0].name_b, "P2");
}

#[test]
fn odd_count_gives_lowest_ranked_player_the_bye() {
    for options in [PairingOptions::default(), PairingOptions::adjacent()] {
        let (t, ids) = tournament_with_players(5, options);
        let round = t.pairings().unwrap();

        assert_eq!(round.pairings.len(), 2);
        let bye = round.bye.clone().unwrap();
        assert_eq!(bye.player, ids[4]);
        assert_eq!(bye.name, "P4");
        let expected: HashSet<[PlayerId; 2]> =
            [[ids[0], ids[1]], [ids[2], ids[3]]].into_iter().collect();
        assert_eq!(pair_set(&round), expected);
    }
}

#[test]
fn fair_byes_skip_players_who_already_had_one() {
    let (mut t, ids) = tournament_with_players(3, PairingOptions::default());
    let first = t.pairings().unwrap();
    assert_eq!(first.bye.as_ref().unwrap().player, ids[2]);
    t.report_match(ids[0], ids[1]).unwrap();
    t.report_bye(ids[2]).unwrap();

    let second = t.pairings().unwrap();
    assert_eq!(second.bye.unwrap().player, ids[1]);
}

#[test]
fn unfair_byes_can_repeat() {
    let (mut t, ids) = tournament_with_players(3, PairingOptions::adjacent());
    // ids[0] beats ids[1] twice; ids[2] keeps sitting at the bottom with one bye.
    t.report_match(ids[0], ids[1]).unwrap();
    t.report_match(ids[0], ids[1]).unwrap();
    t.report_bye(ids[2]).unwrap();
    t.report_match(ids[1], ids[2]).unwrap();
    t.report_match(ids[1], ids[2]).unwrap();

    // Standings: ids[0] 2-0, ids[1] 2-2, ids[2] 1-3 with one bye already.
    let round = t.pairings().unwrap();
    assert_eq!(round.bye.unwrap().player, ids[2]);
}

#[test]
fn nobody_gets_a_second_bye_before_everyone_had_one() {
    let mut rng = StdRng::seed_from_u64(11);
    let (mut t, ids) = tournament_with_players(7, PairingOptions::default());
    let mut bye_holders = HashSet::new();

    for _ in 0..ids.len() {
        let round = t.pairings().unwrap();
        let bye = round.bye.clone().unwrap();
        assert!(bye_holders.insert(bye.player), "second bye for {}", bye.player);
        play(&mut t, &round, &mut rng);
    }
    assert_eq!(bye_holders.len(), ids.len());
}

#[test]
fn rematches_are_avoided_by_looking_further_down() {
    let (mut t, ids) = tournament_with_players(4, PairingOptions::default());
    let [a, b, c, d] = [ids[0], ids[1], ids[2], ids[3]];
    t.report_match(a, b).unwrap();
    t.report_match(c, d).unwrap();
    t.report_match(a, c).unwrap();
    t.report_match(b, d).unwrap();
    // Standings now a, b, c, d; neighbours a-b and c-d already met.

    let round = t.pairings().unwrap();

    let expected: HashSet<[PlayerId; 2]> = [[a, d], [b, c]].into_iter().collect();
    assert_eq!(pair_set(&round), expected);
}

#[test]
fn adjacent_pairing_allows_rematches() {
    let (mut t, ids) = tournament_with_players(4, PairingOptions::adjacent());
    let [a, b, c, d] = [ids[0], ids[1], ids[2], ids[3]];
    t.report_match(a, b).unwrap();
    t.report_match(c, d).unwrap();
    t.report_match(a, c).unwrap();
    t.report_match(b, d).unwrap();

    let round = t.pairings().unwrap();

    let expected: HashSet<[PlayerId; 2]> = [[a, b], [c, d]].into_iter().collect();
    assert_eq!(pair_set(&round), expected);
}

#[test]
fn unavoidable_rematch_still_pairs_everyone() {
    let (mut t, ids) = tournament_with_players(2, PairingOptions::default());
    t.report_match(ids[0], ids[1]).unwrap();

    let round = t.pairings().unwrap();
    assert_eq!(round.pairings.len(), 1);
    assert_eq!(round.pairings[0].player_a, ids[0]);
    assert_eq!(round.pairings[0].player_b, ids[1]);
}

#[test]
fn early_rounds_of_eight_players_never_rematch() {
    let mut rng = StdRng::seed_from_u64(3);
    let (mut t, _) = tournament_with_players(8, PairingOptions::default());
    let mut played: HashSet<[PlayerId; 2]> = HashSet::new();

    for _ in 0..4 {
        let round = t.pairings().unwrap();
        assert_eq!(round.pairings.len(), 4);
        for pair in pair_set(&round) {
            assert!(played.insert(pair), "rematch {:?}", pair);
        }
        play(&mut t, &round, &mut rng);
    }
}

#[test]
fn pairings_follow_standings_order_within_score_groups() {
    let mut rng = StdRng::seed_from_u64(5);
    let (mut t, _) = tournament_with_players(10, PairingOptions::adjacent());

    for _ in 0..3 {
        let round = t.pairings().unwrap();
        let standings = t.standings().unwrap();
        let order: Vec<PlayerId> = round.player_ids();
        let ranked: Vec<PlayerId> = standings.iter().map(|r| r.player).collect();
        assert_eq!(order, ranked);
        play(&mut t, &round, &mut rng);
    }
}

#[test]
fn pairings_do_not_change_the_ledger() {
    let (mut t, ids) = tournament_with_players(6, PairingOptions::default());
    t.report_match(ids[0], ids[5]).unwrap();
    let before = t.standings().unwrap();

    let first = t.pairings().unwrap();
    let second = t.pairings().unwrap();

    assert_eq!(first, second);
    assert_eq!(t.standings().unwrap(), before);
}
