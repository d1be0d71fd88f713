use forum_types::models::Reaction;
use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use super::{now, record_exists, uuid_at};
use crate::{Database, DbError, Result};

const REACTION_COLUMNS: &str = "id, comment_id, username, kind, created_at";

fn reaction_from_row(row: &Row<'_>) -> rusqlite::Result<Reaction> {
    Ok(Reaction {
        id: uuid_at(row, 0)?,
        comment_id: uuid_at(row, 1)?,
        username: row.get(2)?,
        kind: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl Database {
    // -- Reactions --

    /// Attach a reaction to an existing comment. Repeats by the same user are kept.
    pub fn add_reaction(&self, comment_id: &Uuid, username: &str, kind: &str) -> Result<Reaction> {
        let id = Uuid::new_v4();
        let created_at = now();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if !record_exists(&tx, "comments", comment_id)? {
                return Err(DbError::NotFound("comment"));
            }

            tx.execute(
                "INSERT INTO reactions (id, comment_id, username, kind, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id.to_string(), comment_id.to_string(), username, kind, created_at],
            )?;
            tx.commit()?;

            Ok(Reaction {
                id,
                comment_id: *comment_id,
                username: username.to_string(),
                kind: kind.to_string(),
                created_at,
            })
        })
    }

    pub fn list_reactions(&self, comment_id: &Uuid) -> Result<Vec<Reaction>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {REACTION_COLUMNS} FROM reactions WHERE comment_id = ?1 ORDER BY seq"
            ))?;
            let rows = stmt
                .query_map([comment_id.to_string()], reaction_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Delete a reaction only if `username` owns it.
    pub fn remove_reaction(&self, id: &Uuid, username: &str) -> Result<Option<Reaction>> {
        self.with_conn(|conn| {
            let existing = conn
                .query_row(
                    &format!(
                        "SELECT {REACTION_COLUMNS} FROM reactions WHERE id = ?1 AND username = ?2"
                    ),
                    rusqlite::params![id.to_string(), username],
                    reaction_from_row,
                )
                .optional()?;

            if existing.is_some() {
                conn.execute("DELETE FROM reactions WHERE id = ?1", [id.to_string()])?;
            }
            Ok(existing)
        })
    }

    pub fn delete_reactions_for_comment(&self, comment_id: &Uuid) -> Result<usize> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM reactions WHERE comment_id = ?1",
                [comment_id.to_string()],
            )?;
            Ok(deleted)
        })
    }
}
