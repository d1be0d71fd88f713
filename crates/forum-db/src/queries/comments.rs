use forum_types::models::Comment;
use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use super::{now, record_exists, uuid_at};
use crate::{Database, DbError, Result};

const COMMENT_COLUMNS: &str = "id, parent_id, parent_is_post, author_username, body, created_at";

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: uuid_at(row, 0)?,
        parent_id: uuid_at(row, 1)?,
        parent_is_post: row.get(2)?,
        author_username: row.get(3)?,
        body: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl Database {
    // -- Comments --

    /// Insert a comment under an existing post or comment. The parent check
    /// and the insert share one transaction.
    pub fn create_comment(
        &self,
        parent_id: &Uuid,
        parent_is_post: bool,
        author_username: &str,
        body: &str,
    ) -> Result<Comment> {
        let id = Uuid::new_v4();
        let created_at = now();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let (table, what) = if parent_is_post {
                ("posts", "parent post")
            } else {
                ("comments", "parent comment")
            };
            if !record_exists(&tx, table, parent_id)? {
                return Err(DbError::NotFound(what));
            }

            tx.execute(
                "INSERT INTO comments (id, parent_id, parent_is_post, author_username, body, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    id.to_string(),
                    parent_id.to_string(),
                    parent_is_post,
                    author_username,
                    body,
                    created_at
                ],
            )?;
            tx.commit()?;

            Ok(Comment {
                id,
                parent_id: *parent_id,
                parent_is_post,
                author_username: author_username.to_string(),
                body: body.to_string(),
                created_at,
            })
        })
    }

    /// Top-level comments of a post, most recent first. Replies to comments
    /// are not included.
    pub fn list_comments_for_post(&self, post_id: &Uuid) -> Result<Vec<Comment>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COMMENT_COLUMNS} FROM comments
                 WHERE parent_is_post = 1 AND parent_id = ?1
                 ORDER BY seq DESC"
            ))?;
            let rows = stmt
                .query_map([post_id.to_string()], comment_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_comment(&self, id: &Uuid) -> Result<Option<Comment>> {
        self.with_conn(|conn| {
            let comment = conn
                .query_row(
                    &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1"),
                    [id.to_string()],
                    comment_from_row,
                )
                .optional()?;
            Ok(comment)
        })
    }

    /// Remove the comment row only. Its reactions are left to the cascade.
    pub fn delete_comment(&self, id: &Uuid) -> Result<Option<Comment>> {
        self.with_conn(|conn| {
            let existing = conn
                .query_row(
                    &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1"),
                    [id.to_string()],
                    comment_from_row,
                )
                .optional()?;

            if existing.is_some() {
                conn.execute("DELETE FROM comments WHERE id = ?1", [id.to_string()])?;
            }
            Ok(existing)
        })
    }
}
