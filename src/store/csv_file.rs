//! CSV-file record store: one file per record kind inside a directory.
//!
//! Everything is loaded on open and kept in a [`MemoryStore`]. Each mutation is
//! applied to a copy and every file it touches is written to a temp file before any
//! of them is renamed into place; the copy becomes the current state only after all
//! renames succeed. A failed temp write leaves both disk and memory unchanged.
//! `sequences.csv` is renamed first, so a rename failing part-way can at worst make
//! the store skip ids. Renames of two record files (a ledger reset) are not atomic
//! as a pair.

use crate::models::{ByeRecord, MatchRecord, Player, PlayerId};
use crate::store::memory::{MemoryStore, Sequences};
use crate::store::{RecordStore, StoreError};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const PLAYERS_FILE: &str = "players.csv";
const MATCHES_FILE: &str = "matches.csv";
const BYES_FILE: &str = "byes.csv";
const SEQUENCES_FILE: &str = "sequences.csv";

/// Which files a mutation touched.
#[derive(Clone, Copy)]
enum Kind {
    Players,
    Matches,
    Byes,
}

#[derive(Debug)]
pub struct CsvStore {
    dir: PathBuf,
    inner: MemoryStore,
}

impl CsvStore {
    /// Open (or create) a store in `dir`. Missing files are treated as empty.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let players: Vec<Player> = read_records(&dir.join(PLAYERS_FILE))?;
        let matches: Vec<MatchRecord> = read_records(&dir.join(MATCHES_FILE))?;
        let byes: Vec<ByeRecord> = read_records(&dir.join(BYES_FILE))?;
        let sequences = read_records::<Sequences>(&dir.join(SEQUENCES_FILE))?
            .into_iter()
            .next()
            .unwrap_or_default();
        log::debug!(
            "Opened CSV store at {} ({} players, {} matches, {} byes)",
            dir.display(),
            players.len(),
            matches.len(),
            byes.len()
        );
        Ok(Self {
            dir,
            inner: MemoryStore::from_records(players, matches, byes, sequences),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn commit(&mut self, next: MemoryStore, kinds: &[Kind]) -> Result<(), StoreError> {
        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::new();
        let result = self
            .stage_all(&next, kinds, &mut staged)
            .and_then(|()| {
                for (tmp, path) in &staged {
                    fs::rename(tmp, path)?;
                }
                Ok(())
            });
        if let Err(e) = result {
            for (tmp, _) in &staged {
                let _ = fs::remove_file(tmp);
            }
            return Err(e);
        }
        self.inner = next;
        Ok(())
    }

    fn stage_all(
        &self,
        next: &MemoryStore,
        kinds: &[Kind],
        staged: &mut Vec<(PathBuf, PathBuf)>,
    ) -> Result<(), StoreError> {
        if next.sequences() != self.inner.sequences() {
            stage(&self.dir.join(SEQUENCES_FILE), &[next.sequences()], staged)?;
        }
        for kind in kinds {
            match kind {
                Kind::Players => stage(&self.dir.join(PLAYERS_FILE), next.player_slice(), staged)?,
                Kind::Matches => stage(&self.dir.join(MATCHES_FILE), next.match_slice(), staged)?,
                Kind::Byes => stage(&self.dir.join(BYES_FILE), next.bye_slice(), staged)?,
            }
        }
        Ok(())
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader.deserialize().collect::<Result<Vec<T>, csv::Error>>()?;
    Ok(records)
}

/// Write `records` to `path`'s temp sibling and queue the rename.
fn stage<T: Serialize>(
    path: &Path,
    records: &[T],
    staged: &mut Vec<(PathBuf, PathBuf)>,
) -> Result<(), StoreError> {
    let tmp = path.with_extension("csv.tmp");
    staged.push((tmp.clone(), path.to_path_buf()));
    let mut writer = csv::Writer::from_path(&tmp)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

impl RecordStore for CsvStore {
    fn insert_player(&mut self, name: &str) -> Result<Player, StoreError> {
        let mut next = self.inner.clone();
        let player = next.insert_player(name)?;
        self.commit(next, &[Kind::Players])?;
        Ok(player)
    }

    fn players(&self) -> Result<Vec<Player>, StoreError> {
        self.inner.players()
    }

    fn delete_players(&mut self) -> Result<(), StoreError> {
        let mut next = self.inner.clone();
        next.delete_players()?;
        self.commit(next, &[Kind::Players])
    }

    fn insert_match(
        &mut self,
        player1: PlayerId,
        player2: PlayerId,
        winner: PlayerId,
        reported_at: DateTime<Utc>,
    ) -> Result<MatchRecord, StoreError> {
        let mut next = self.inner.clone();
        let record = next.insert_match(player1, player2, winner, reported_at)?;
        self.commit(next, &[Kind::Matches])?;
        Ok(record)
    }

    fn matches(&self) -> Result<Vec<MatchRecord>, StoreError> {
        self.inner.matches()
    }

    fn delete_matches(&mut self) -> Result<(), StoreError> {
        let mut next = self.inner.clone();
        next.delete_matches()?;
        self.commit(next, &[Kind::Matches])
    }

    fn insert_bye(
        &mut self,
        player: PlayerId,
        reported_at: DateTime<Utc>,
    ) -> Result<ByeRecord, StoreError> {
        let mut next = self.inner.clone();
        let record = next.insert_bye(player, reported_at)?;
        self.commit(next, &[Kind::Byes])?;
        Ok(record)
    }

    fn byes(&self) -> Result<Vec<ByeRecord>, StoreError> {
        self.inner.byes()
    }

    fn delete_byes(&mut self) -> Result<(), StoreError> {
        let mut next = self.inner.clone();
        next.delete_byes()?;
        self.commit(next, &[Kind::Byes])
    }

    fn delete_ledger(&mut self) -> Result<(), StoreError> {
        let mut next = self.inner.clone();
        next.delete_matches()?;
        next.delete_byes()?;
        self.commit(next, &[Kind::Matches, Kind::Byes])
    }
}
