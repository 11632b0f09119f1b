mod catalog;
mod players;

use core::fmt;
use std::{
    collections::HashSet,
    fs,
    path::Path,
    sync::{Mutex, MutexGuard},
};

use asteroid_dodger_core::catalog::{AsteroidKind, Material, SizeClass};
use asteroid_dodger_core::constants::TOP_SCORES_LIMIT;
use asteroid_dodger_core::error::ScoreBoardError;
use asteroid_dodger_core::scoreboard::{player_key, ScoreBoard, ScoreEntry};
use rusqlite::{params, Connection};
use serde::Serialize;

pub const DB_FILE_NAME: &str = "dodger.db";
pub const MAX_PLAYER_NAME_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Unique name already taken (case-insensitive).
    Conflict(String),
    NotFound(String),
    /// Rejected input: blank or oversized names, negative scores, bad catalog fields.
    Invalid(String),
    Database(String),
}

impl StoreError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::Invalid(_) => "invalid_request",
            Self::Database(_) => "internal_error",
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict(msg) | Self::NotFound(msg) | Self::Invalid(msg) => f.write_str(msg),
            Self::Database(msg) => write!(f, "database error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub created_at_unix_s: u64,
    pub updated_at_unix_s: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreRecord {
    pub id: i64,
    pub player_id: i64,
    pub score: i64,
    pub created_at_unix_s: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopScore {
    pub name: String,
    pub high_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsteroidArchetype {
    pub id: i64,
    pub size: SizeClass,
    pub speed: i64,
    pub material: Material,
    pub kind: AsteroidKind,
    pub spawn_rate: i64,
    pub created_at_unix_s: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub players: u64,
    pub scores: u64,
    pub asteroids: u64,
}

/// SQLite-backed store for players, their scores and the asteroid catalog.
///
/// All access goes through one connection behind a mutex, so every method is
/// a short synchronous critical section.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) `{data_dir}/dodger.db`.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(data_dir).map_err(|e| {
            StoreError::Database(format!(
                "failed to create data dir {}: {e}",
                data_dir.display()
            ))
        })?;
        Self::open_file(&data_dir.join(DB_FILE_NAME))
    }

    pub fn open_file(db_path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path).map_err(|e| {
            StoreError::Database(format!(
                "failed to open SQLite at {}: {e}",
                db_path.display()
            ))
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;
             PRAGMA synchronous=NORMAL;
             PRAGMA foreign_keys=ON;",
        )
        .map_err(|e| StoreError::Database(format!("failed to set pragmas: {e}")))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS players (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                name_key    TEXT NOT NULL,
                created_at  INTEGER NOT NULL,
                updated_at  INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS scores (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                player_id   INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
                value       INTEGER NOT NULL CHECK (value >= 0),
                created_at  INTEGER NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_scores_player ON scores(player_id);
             CREATE TABLE IF NOT EXISTS asteroids (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                size        TEXT NOT NULL,
                speed       INTEGER NOT NULL,
                material    TEXT NOT NULL,
                kind        TEXT NOT NULL,
                spawn_rate  INTEGER NOT NULL,
                created_at  INTEGER NOT NULL
             );",
        )
        .map_err(|e| StoreError::Database(format!("failed to create schema: {e}")))?;

        Self::ensure_name_keys(&conn)?;
        conn.execute_batch(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_players_name_key ON players(name_key);",
        )
        .map_err(|e| StoreError::Database(format!("failed to index player names: {e}")))?;

        tracing::debug!(path = %db_path.display(), "store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Databases created before `name_key` existed get the column added and
    /// backfilled from `name`.
    fn ensure_name_keys(conn: &Connection) -> Result<(), StoreError> {
        let columns = {
            let mut stmt = conn.prepare("PRAGMA table_info(players)")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
            rows.collect::<Result<HashSet<_>, _>>()?
        };
        if columns.contains("name_key") {
            return Ok(());
        }

        tracing::warn!("applying players.name_key migration");
        conn.execute_batch("ALTER TABLE players ADD COLUMN name_key TEXT NOT NULL DEFAULT '';")
            .map_err(|e| StoreError::Database(format!("failed to add players.name_key: {e}")))?;
        let names = {
            let mut stmt = conn.prepare("SELECT id, name FROM players")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?;
            rows.collect::<Result<Vec<_>, _>>()?
        };
        for (id, name) in names {
            conn.execute(
                "UPDATE players SET name_key = ?1 WHERE id = ?2",
                params![player_key(&name), id],
            )?;
        }
        Ok(())
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("store lock poisoned".to_string()))
    }

    pub fn counts(&self) -> Result<StoreCounts, StoreError> {
        let conn = self.lock()?;
        let count = |table: &str| -> Result<u64, StoreError> {
            let n: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(n.max(0) as u64)
        };
        Ok(StoreCounts {
            players: count("players")?,
            scores: count("scores")?,
            asteroids: count("asteroids")?,
        })
    }

    /// Fold the WAL back into the main database file.
    pub fn checkpoint(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}

/// Trimmed player name, or `Invalid` when blank or longer than 100 chars.
pub fn normalize_player_name(name: &str) -> Result<String, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Invalid("player name is required".to_string()));
    }
    if trimmed.chars().count() > MAX_PLAYER_NAME_CHARS {
        return Err(StoreError::Invalid(format!(
            "player name must be at most {MAX_PLAYER_NAME_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[inline]
pub(crate) fn unix_s_from_db(value: i64) -> u64 {
    value.max(0) as u64
}

fn board_error(err: StoreError) -> ScoreBoardError {
    match err {
        StoreError::Database(msg) => ScoreBoardError::Unavailable(msg),
        other => ScoreBoardError::Rejected(other.to_string()),
    }
}

impl ScoreBoard for &Store {
    fn top_scores(&mut self) -> Result<Vec<ScoreEntry>, ScoreBoardError> {
        let top = Store::top_scores(*self, TOP_SCORES_LIMIT).map_err(board_error)?;
        Ok(top
            .into_iter()
            .map(|entry| ScoreEntry {
                name: entry.name,
                high_score: entry.high_score,
            })
            .collect())
    }

    fn submit_score(&mut self, player: &str, score: i64) -> Result<(), ScoreBoardError> {
        self.record_score(player, score)
            .map(|_| ())
            .map_err(board_error)
    }
}

impl ScoreBoard for Store {
    fn top_scores(&mut self) -> Result<Vec<ScoreEntry>, ScoreBoardError> {
        ScoreBoard::top_scores(&mut &*self)
    }

    fn submit_score(&mut self, player: &str, score: i64) -> Result<(), ScoreBoardError> {
        ScoreBoard::submit_score(&mut &*self, player, score)
    }
}
