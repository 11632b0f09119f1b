use asteroid_dodger_core::catalog::ArchetypeSpec;
use rusqlite::params;

use super::*;
use crate::now_unix_s;

struct RawAsteroidRow {
    id: i64,
    size: String,
    speed: i64,
    material: String,
    kind: String,
    spawn_rate: i64,
    created_at: i64,
}

impl RawAsteroidRow {
    fn into_archetype(self) -> Result<AsteroidArchetype, StoreError> {
        let bad = |err: asteroid_dodger_core::error::UnknownVariant| {
            StoreError::Database(format!("bad asteroid row {} in db: {err}", self.id))
        };
        Ok(AsteroidArchetype {
            id: self.id,
            size: self.size.parse().map_err(bad)?,
            speed: self.speed,
            material: self.material.parse().map_err(bad)?,
            kind: self.kind.parse().map_err(bad)?,
            spawn_rate: self.spawn_rate,
            created_at_unix_s: unix_s_from_db(self.created_at),
        })
    }
}

impl Store {
    pub fn list_asteroids(&self) -> Result<Vec<AsteroidArchetype>, StoreError> {
        let rows = {
            let conn = self.lock()?;
            let mut stmt = conn.prepare(
                "SELECT id, size, speed, material, kind, spawn_rate, created_at
                 FROM asteroids ORDER BY id",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(RawAsteroidRow {
                        id: row.get(0)?,
                        size: row.get(1)?,
                        speed: row.get(2)?,
                        material: row.get(3)?,
                        kind: row.get(4)?,
                        spawn_rate: row.get(5)?,
                        created_at: row.get(6)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        rows.into_iter().map(RawAsteroidRow::into_archetype).collect()
    }

    pub fn create_asteroid(&self, spec: &ArchetypeSpec) -> Result<AsteroidArchetype, StoreError> {
        spec.validate()
            .map_err(|err| StoreError::Invalid(err.to_string()))?;

        let conn = self.lock()?;
        let now = now_unix_s();
        conn.execute(
            "INSERT INTO asteroids (size, speed, material, kind, spawn_rate, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                spec.size.as_str(),
                spec.speed,
                spec.material.as_str(),
                spec.kind.as_str(),
                spec.spawn_rate,
                now as i64,
            ],
        )?;
        let archetype = AsteroidArchetype {
            id: conn.last_insert_rowid(),
            size: spec.size,
            speed: spec.speed,
            material: spec.material,
            kind: spec.kind,
            spawn_rate: spec.spawn_rate,
            created_at_unix_s: now,
        };
        tracing::info!(asteroid_id = archetype.id, "asteroid archetype created");
        Ok(archetype)
    }

    pub fn delete_asteroid(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM asteroids WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!("asteroid not found: {id}")));
        }
        tracing::info!(asteroid_id = id, "asteroid archetype deleted");
        Ok(())
    }
}
