//! Swiss-system tournament engine: library with models, record stores and business logic.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    compute_standings, count_players, delete_matches, delete_players, find_match, find_player,
    matches_for, opponents, pair_round, player_standings, rank_order, register_player,
    report_bye, report_match, swiss_pairings,
};
pub use models::{
    Bye, ByeId, ByeRecord, LedgerRef, MatchId, MatchRecord, Pairing, PairingOptions, Player,
    PlayerId, Round, StandingRow, Tournament, TournamentError,
};
pub use store::{CsvStore, MemoryStore, RecordStore, Sequences, StoreError};
