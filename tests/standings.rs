//! Integration tests for standings: completeness, ordering, conservation, integrity.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use swiss_tournament::{
    LedgerRef, MemoryStore, PairingOptions, RecordStore, Tournament, TournamentError,
};

fn tournament_with_players(n: usize) -> (Tournament<MemoryStore>, Vec<u64>) {
    let mut t = Tournament::new(MemoryStore::new(), PairingOptions::default());
    let ids = (0..n)
        .map(|i| t.register_player(&format!("P{i}")).unwrap())
        .collect();
    (t, ids)
}

#[test]
fn empty_tournament_has_empty_standings() {
    let (t, _) = tournament_with_players(0);
    assert!(t.standings().unwrap().is_empty());
}

#[test]
fn new_players_appear_with_no_matches() {
    let (t, ids) = tournament_with_players(6);
    let standings = t.standings().unwrap();

    assert_eq!(standings.len(), 6);
    for row in &standings {
        assert_eq!(row.wins, 0);
        assert_eq!(row.matches, 0);
    }
    // All tied: ascending id.
    let order: Vec<_> = standings.iter().map(|r| r.player).collect();
    assert_eq!(order, ids);
}

#[test]
fn reported_matches_update_wins_and_matches() {
    let (mut t, ids) = tournament_with_players(4);
    let [a, b, c, d] = [ids[0], ids[1], ids[2], ids[3]];
    t.report_match(a, b).unwrap();
    t.report_match(c, d).unwrap();

    let standings = t.standings().unwrap();
    for row in &standings {
        assert_eq!(row.matches, 1);
        if row.player == a || row.player == c {
            assert_eq!(row.wins, 1);
        } else {
            assert_eq!(row.wins, 0);
            assert_eq!(row.losses(), 1);
        }
    }
    let order: Vec<_> = standings.iter().map(|r| r.player).collect();
    assert_eq!(order, vec![a, c, b, d]);
}

#[test]
fn fewer_matches_breaks_ties_on_wins() {
    let (mut t, ids) = tournament_with_players(3);
    let [a, b, c] = [ids[0], ids[1], ids[2]];
    // a: 1 win in 2 matches, c: 1 win in 1 match.
    t.report_match(a, b).unwrap();
    t.report_match(b, a).unwrap();
    t.report_bye(c).unwrap();

    let standings = t.standings().unwrap();
    assert_eq!(standings[0].player, c);
    assert_eq!(standings[0].byes, 1);
    assert_eq!(standings[1].player, a);
    assert_eq!(standings[2].player, b);
}

#[test]
fn bye_counts_as_win_and_match() {
    let (mut t, ids) = tournament_with_players(2);
    t.report_bye(ids[1]).unwrap();

    let row = t
        .standings()
        .unwrap()
        .into_iter()
        .find(|r| r.player == ids[1])
        .unwrap();
    assert_eq!((row.wins, row.matches, row.byes), (1, 1, 1));
}

#[test]
fn wins_and_matches_are_conserved_over_random_results() {
    let mut rng = StdRng::seed_from_u64(7);
    let (mut t, ids) = tournament_with_players(9);
    let mut reported = 0u32;

    for _ in 0..60 {
        let i = rng.gen_range(0..ids.len());
        let mut j = rng.gen_range(0..ids.len());
        if i == j {
            j = (j + 1) % ids.len();
        }
        let before = t.standings().unwrap();
        t.report_match(ids[i], ids[j]).unwrap();
        reported += 1;
        let after = t.standings().unwrap();

        let row = |rows: &[swiss_tournament::StandingRow], id| {
            rows.iter().find(|r| r.player == id).cloned().unwrap()
        };
        let (wb, wa) = (row(&before, ids[i]), row(&after, ids[i]));
        let (lb, la) = (row(&before, ids[j]), row(&after, ids[j]));
        assert_eq!(wa.wins, wb.wins + 1);
        assert_eq!(wa.matches, wb.matches + 1);
        assert_eq!(la.wins, lb.wins);
        assert_eq!(la.matches, lb.matches + 1);

        let total_matches: u32 = after.iter().map(|r| r.matches).sum();
        let total_wins: u32 = after.iter().map(|r| r.wins).sum();
        assert_eq!(total_matches, 2 * reported);
        assert_eq!(total_wins, reported);
        assert!(after.iter().all(|r| r.wins <= r.matches));
        assert!(after.windows(2).all(|w| w[0].wins >= w[1].wins));
    }
}

#[test]
fn standings_are_stable_across_calls() {
    let (mut t, ids) = tournament_with_players(8);
    t.report_match(ids[3], ids[4]).unwrap();
    t.report_match(ids[7], ids[0]).unwrap();
    assert_eq!(t.standings().unwrap(), t.standings().unwrap());
}

#[test]
fn dangling_match_is_a_data_integrity_error() {
    let mut store = MemoryStore::new();
    let a = store.insert_player("Melpomene Murray").unwrap();
    let m = store
        .insert_match(a.id, a.id + 50, a.id, chrono::Utc::now())
        .unwrap();
    let t = Tournament::new(store, PairingOptions::default());

    let err = t.standings().unwrap_err();
    assert!(matches!(
        err,
        TournamentError::DataIntegrity { record: LedgerRef::Match(id), player }
            if id == m.id && player == a.id + 50
    ));
    assert!(matches!(
        t.pairings(),
        Err(TournamentError::DataIntegrity { .. })
    ));
}

#[test]
fn stored_match_with_outside_winner_is_rejected() {
    let mut store = MemoryStore::new();
    let a = store.insert_player("Bruno Walton").unwrap().id;
    let b = store.insert_player("Boots O'Neal").unwrap().id;
    let c = store.insert_player("Cathy Burton").unwrap().id;
    let m = store.insert_match(a, b, c, chrono::Utc::now()).unwrap();
    let t = Tournament::new(store, PairingOptions::default());

    assert!(matches!(
        t.standings(),
        Err(TournamentError::MalformedMatch(id)) if id == m.id
    ));
    assert!(matches!(
        t.pairings(),
        Err(TournamentError::MalformedMatch(_))
    ));
}

#[test]
fn stored_self_match_is_rejected() {
    let mut store = MemoryStore::new();
    let a = store.insert_player("Diane Grant").unwrap().id;
    let m = store.insert_match(a, a, a, chrono::Utc::now()).unwrap();
    let t = Tournament::new(store, PairingOptions::default());

    assert!(matches!(
        t.standings(),
        Err(TournamentError::MalformedMatch(id)) if id == m.id
    ));
}

#[test]
fn losses_never_underflow() {
    let row = swiss_tournament::StandingRow {
        player: 1,
        name: "Chandra Nalaar".to_string(),
        wins: 1,
        matches: 0,
        byes: 0,
    };
    assert_eq!(row.losses(), 0);
}

#[test]
fn dangling_bye_is_a_data_integrity_error() {
    let mut store = MemoryStore::new();
    store.insert_player("Randy Schwartz").unwrap();
    let bye = store.insert_bye(99, chrono::Utc::now()).unwrap();
    let t = Tournament::new(store, PairingOptions::default());

    assert!(matches!(
        t.standings(),
        Err(TournamentError::DataIntegrity {
            record: LedgerRef::Bye(id),
            player: 99,
        }) if id == bye.id
    ));
}
