use rusqlite::{params, Connection, OptionalExtension, Row};

use super::*;
use crate::now_unix_s;

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at_unix_s: unix_s_from_db(row.get(2)?),
        updated_at_unix_s: unix_s_from_db(row.get(3)?),
    })
}

fn score_from_row(row: &Row<'_>) -> rusqlite::Result<ScoreRecord> {
    Ok(ScoreRecord {
        id: row.get(0)?,
        player_id: row.get(1)?,
        score: row.get(2)?,
        created_at_unix_s: unix_s_from_db(row.get(3)?),
    })
}

/// Case-insensitive lookup through the folded `name_key`.
fn find_player(conn: &Connection, name: &str) -> Result<Option<Player>, StoreError> {
    let player = conn
        .query_row(
            "SELECT id, name, created_at, updated_at FROM players WHERE name_key = ?1",
            params![player_key(name)],
            player_from_row,
        )
        .optional()?;
    Ok(player)
}

fn insert_player(conn: &Connection, name: &str) -> Result<Player, StoreError> {
    let now = now_unix_s();
    conn.execute(
        "INSERT INTO players (name, name_key, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
        params![name, player_key(name), now as i64],
    )?;
    Ok(Player {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        created_at_unix_s: now,
        updated_at_unix_s: now,
    })
}

fn player_not_found(name: &str) -> StoreError {
    StoreError::NotFound(format!("player not found: {name}"))
}

impl Store {
    pub fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, name, created_at, updated_at FROM players ORDER BY id")?;
        let players = stmt
            .query_map([], player_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(players)
    }

    pub fn get_player(&self, name: &str) -> Result<Option<Player>, StoreError> {
        let name = normalize_player_name(name)?;
        let conn = self.lock()?;
        find_player(&conn, &name)
    }

    pub fn create_player(&self, name: &str) -> Result<Player, StoreError> {
        let name = normalize_player_name(name)?;
        let conn = self.lock()?;
        if let Some(existing) = find_player(&conn, &name)? {
            return Err(StoreError::Conflict(format!(
                "player name already taken: {}",
                existing.name
            )));
        }
        let player = insert_player(&conn, &name)?;
        tracing::info!(player_id = player.id, name = %player.name, "player created");
        Ok(player)
    }

    /// Renaming to a different casing of the same name is allowed.
    pub fn rename_player(&self, old_name: &str, new_name: &str) -> Result<Player, StoreError> {
        let old_name = normalize_player_name(old_name)?;
        let new_name = normalize_player_name(new_name)?;
        let conn = self.lock()?;

        let player = find_player(&conn, &old_name)?.ok_or_else(|| player_not_found(&old_name))?;
        if let Some(holder) = find_player(&conn, &new_name)? {
            if holder.id != player.id {
                return Err(StoreError::Conflict(format!(
                    "player name already taken: {}",
                    holder.name
                )));
            }
        }

        let now = now_unix_s();
        conn.execute(
            "UPDATE players SET name = ?1, name_key = ?2, updated_at = ?3 WHERE id = ?4",
            params![new_name, player_key(&new_name), now as i64, player.id],
        )?;
        tracing::info!(player_id = player.id, from = %player.name, to = %new_name, "player renamed");

        Ok(Player {
            name: new_name,
            updated_at_unix_s: now,
            ..player
        })
    }

    /// Deletes the player and, through the foreign key, every score they own.
    pub fn delete_player(&self, name: &str) -> Result<Player, StoreError> {
        let name = normalize_player_name(name)?;
        let conn = self.lock()?;
        let player = find_player(&conn, &name)?.ok_or_else(|| player_not_found(&name))?;
        conn.execute("DELETE FROM players WHERE id = ?1", params![player.id])?;
        tracing::info!(player_id = player.id, name = %player.name, "player deleted");
        Ok(player)
    }

    /// Appends a score, creating the player on first submission.
    pub fn record_score(&self, name: &str, score: i64) -> Result<ScoreRecord, StoreError> {
        let name = normalize_player_name(name)?;
        if score < 0 {
            return Err(StoreError::Invalid(format!(
                "score must not be negative, got {score}"
            )));
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let player = match find_player(&tx, &name)? {
            Some(player) => player,
            None => insert_player(&tx, &name)?,
        };
        let now = now_unix_s();
        tx.execute(
            "INSERT INTO scores (player_id, value, created_at) VALUES (?1, ?2, ?3)",
            params![player.id, score, now as i64],
        )?;
        let record = ScoreRecord {
            id: tx.last_insert_rowid(),
            player_id: player.id,
            score,
            created_at_unix_s: now,
        };
        tx.commit()?;

        tracing::debug!(player_id = player.id, score, "score recorded");
        Ok(record)
    }

    /// Score history, newest first.
    pub fn player_scores(&self, name: &str) -> Result<Vec<ScoreRecord>, StoreError> {
        let name = normalize_player_name(name)?;
        let conn = self.lock()?;
        let player = find_player(&conn, &name)?.ok_or_else(|| player_not_found(&name))?;

        let mut stmt = conn.prepare(
            "SELECT id, player_id, value, created_at FROM scores
             WHERE player_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let scores = stmt
            .query_map(params![player.id], score_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(scores)
    }

    /// Best score per player; players that never scored count as 0.
    pub fn top_scores(&self, limit: usize) -> Result<Vec<TopScore>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT p.name, COALESCE(MAX(s.value), 0) AS high_score
             FROM players p
             LEFT JOIN scores s ON s.player_id = p.id
             GROUP BY p.id
             ORDER BY high_score DESC, p.name ASC
             LIMIT ?1",
        )?;
        let top = stmt
            .query_map(params![limit as i64], |row| {
                Ok(TopScore {
                    name: row.get(0)?,
                    high_score: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(top)
    }
}
