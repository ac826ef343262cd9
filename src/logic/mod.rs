//! Tournament business logic: registry, ledger, standings, pairings.
//!
//! Every function takes the record store as an explicit argument.

pub mod ledger;
pub mod pairing;
pub mod registry;
pub mod standings;

pub use ledger::{
    delete_matches, find_match, matches_for, opponents, report_bye, report_match,
};
pub use pairing::{pair_round, swiss_pairings};
pub use registry::{count_players, delete_players, find_player, register_player};
pub use standings::{compute_standings, player_standings, rank_order};
