//! Data structures for the Swiss tournament: players, ledger records, standings, pairings.

mod game;
mod pairing;
mod player;
mod standing;
mod tournament;

pub use game::{ByeId, ByeRecord, MatchId, MatchRecord};
pub use pairing::{Bye, Pairing, PairingOptions, Round};
pub use player::{Player, PlayerId};
pub use standing::StandingRow;
pub use tournament::{LedgerRef, Tournament, TournamentError};
