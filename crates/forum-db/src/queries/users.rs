use forum_types::api::UpdateResult;
use forum_types::models::Profile;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use super::{now, uuid_at};
use crate::models::UserRow;
use crate::{Database, DbError, Result};

impl Database {
    // -- Users --

    pub fn user_exists(&self, username: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let exists = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
                [username],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    /// Insert a user. The unique index on `username` closes the
    /// check-then-insert race between concurrent signups.
    pub fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        description: Option<&str>,
    ) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password_hash, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id.to_string(), username, password_hash, description, now()],
            )
            .map_err(|e| DbError::unique(e, "username"))?;
            Ok(id)
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn get_profile(&self, username: &str) -> Result<Option<Profile>> {
        self.with_conn(|conn| {
            let profile = conn
                .query_row(
                    "SELECT username, description FROM users WHERE username = ?1",
                    [username],
                    |row| {
                        Ok(Profile {
                            username: row.get(0)?,
                            description: row.get(1)?,
                        })
                    },
                )
                .optional()?;
            Ok(profile)
        })
    }

    pub fn update_description(&self, username: &str, description: &str) -> Result<UpdateResult> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let current: Option<Option<String>> = tx
                .query_row(
                    "SELECT description FROM users WHERE username = ?1",
                    [username],
                    |row| row.get(0),
                )
                .optional()?;

            let result = match current {
                None => UpdateResult { matched: 0, modified: 0 },
                Some(Some(ref existing)) if existing == description => {
                    UpdateResult { matched: 1, modified: 0 }
                }
                Some(_) => {
                    let modified = tx.execute(
                        "UPDATE users SET description = ?2 WHERE username = ?1",
                        [username, description],
                    )?;
                    UpdateResult { matched: 1, modified }
                }
            };

            tx.commit()?;
            Ok(result)
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, password_hash, description, created_at FROM users WHERE username = ?1",
    )?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: uuid_at(row, 0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
                description: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_username_is_a_conflict() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("alice", "hash", None).unwrap();

        let err = db.create_user("alice", "other-hash", None).unwrap_err();
        assert!(matches!(err, DbError::Conflict("username")));

        let count: i64 = db
            .with_conn(|c| Ok(c.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("alice", "hash", None).unwrap();
        db.create_user("Alice", "hash", None).unwrap();

        assert!(db.user_exists("alice").unwrap());
        assert!(db.user_exists("Alice").unwrap());
        assert!(!db.user_exists("ALICE").unwrap());
    }

    #[test]
    fn profile_omits_password_hash() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_user("bob", "$argon2id$secret", Some("hi")).unwrap();

        let row = db.get_user_by_username("bob").unwrap().unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.password_hash, "$argon2id$secret");

        let profile = db.get_profile("bob").unwrap().unwrap();
        assert_eq!(
            profile,
            Profile { username: "bob".into(), description: Some("hi".into()) }
        );
        assert!(db.get_profile("nobody").unwrap().is_none());
    }

    #[test]
    fn description_update_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("carol", "hash", None).unwrap();

        let first = db.update_description("carol", "rustacean").unwrap();
        assert_eq!(first, UpdateResult { matched: 1, modified: 1 });

        let second = db.update_description("carol", "rustacean").unwrap();
        assert_eq!(second, UpdateResult { matched: 1, modified: 0 });

        let missing = db.update_description("nobody", "x").unwrap();
        assert_eq!(missing, UpdateResult { matched: 0, modified: 0 });

        let profile = db.get_profile("carol").unwrap().unwrap();
        assert_eq!(profile.description.as_deref(), Some("rustacean"));
    }
}
