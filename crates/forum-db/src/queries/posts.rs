use forum_types::models::Post;
use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use super::{now, uuid_at};
use crate::{Database, Result};

const POST_COLUMNS: &str = "id, seq, author_username, title, body, created_at";

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: uuid_at(row, 0)?,
        created_order: row.get(1)?,
        author_username: row.get(2)?,
        title: row.get(3)?,
        body: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl Database {
    // -- Posts --

    pub fn create_post(&self, author_username: &str, title: &str, body: &str) -> Result<Post> {
        let id = Uuid::new_v4();
        let created_at = now();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (id, author_username, title, body, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id.to_string(), author_username, title, body, created_at],
            )?;

            Ok(Post {
                id,
                created_order: conn.last_insert_rowid(),
                author_username: author_username.to_string(),
                title: title.to_string(),
                body: body.to_string(),
                created_at,
            })
        })
    }

    /// Every post, most recent first.
    pub fn list_posts(&self) -> Result<Vec<Post>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {POST_COLUMNS} FROM posts ORDER BY seq DESC"))?;
            let rows = stmt
                .query_map([], post_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_post(&self, id: &Uuid) -> Result<Option<Post>> {
        self.with_conn(|conn| {
            let post = conn
                .query_row(
                    &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
                    [id.to_string()],
                    post_from_row,
                )
                .optional()?;
            Ok(post)
        })
    }

    /// Remove the post row only. Comments and votes are left to the cascade.
    pub fn delete_post(&self, id: &Uuid) -> Result<Option<Post>> {
        self.with_conn(|conn| {
            let existing = conn
                .query_row(
                    &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
                    [id.to_string()],
                    post_from_row,
                )
                .optional()?;

            if existing.is_some() {
                conn.execute("DELETE FROM posts WHERE id = ?1", [id.to_string()])?;
            }
            Ok(existing)
        })
    }
}
