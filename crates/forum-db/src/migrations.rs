use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Forum DB: running migration v1 (initial schema)");
        // No foreign keys: posts, comments, votes and reactions reference each
        // other loosely and the cascade coordinator owns cleanup.
        conn.execute_batch(
            "
            CREATE TABLE users (
                id              TEXT PRIMARY KEY,
                username        TEXT NOT NULL UNIQUE,
                password_hash   TEXT NOT NULL,
                description     TEXT,
                created_at      TEXT NOT NULL
            );

            CREATE TABLE posts (
                seq             INTEGER PRIMARY KEY AUTOINCREMENT,
                id              TEXT NOT NULL UNIQUE,
                author_username TEXT NOT NULL,
                title           TEXT NOT NULL,
                body            TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE TABLE comments (
                seq             INTEGER PRIMARY KEY AUTOINCREMENT,
                id              TEXT NOT NULL UNIQUE,
                parent_id       TEXT NOT NULL,
                parent_is_post  INTEGER NOT NULL,
                author_username TEXT NOT NULL,
                body            TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE INDEX idx_comments_parent
                ON comments(parent_id, parent_is_post);

            CREATE TABLE votes (
                seq             INTEGER PRIMARY KEY AUTOINCREMENT,
                id              TEXT NOT NULL UNIQUE,
                target_id       TEXT NOT NULL,
                target_kind     TEXT NOT NULL CHECK (target_kind IN ('post', 'comment')),
                username        TEXT NOT NULL,
                vote_type       TEXT NOT NULL CHECK (vote_type IN ('up', 'down')),
                created_at      TEXT NOT NULL,
                UNIQUE(target_id, username)
            );

            CREATE TABLE reactions (
                seq             INTEGER PRIMARY KEY AUTOINCREMENT,
                id              TEXT NOT NULL UNIQUE,
                comment_id      TEXT NOT NULL,
                username        TEXT NOT NULL,
                kind            TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE INDEX idx_reactions_comment
                ON reactions(comment_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
