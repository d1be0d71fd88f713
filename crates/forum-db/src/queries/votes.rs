use forum_types::api::VotesResponse;
use forum_types::models::{TargetKind, Vote, VoteType};
use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use super::{now, parse_at, record_exists, uuid_at};
use crate::{Database, DbError, Result};

const VOTE_COLUMNS: &str = "id, target_id, target_kind, username, vote_type, created_at";

fn vote_from_row(row: &Row<'_>) -> rusqlite::Result<Vote> {
    Ok(Vote {
        id: uuid_at(row, 0)?,
        target_id: uuid_at(row, 1)?,
        target_kind: parse_at(row, 2)?,
        username: row.get(3)?,
        vote_type: parse_at(row, 4)?,
        created_at: row.get(5)?,
    })
}

impl Database {
    // -- Votes --

    /// Record a vote. One vote per user per target: a second vote by the same
    /// user is rejected as a conflict rather than stored twice.
    pub fn add_vote(
        &self,
        target_id: &Uuid,
        target_kind: TargetKind,
        username: &str,
        vote_type: VoteType,
    ) -> Result<Vote> {
        let id = Uuid::new_v4();
        let created_at = now();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let (table, what) = match target_kind {
                TargetKind::Post => ("posts", "post"),
                TargetKind::Comment => ("comments", "comment"),
            };
            if !record_exists(&tx, table, target_id)? {
                return Err(DbError::NotFound(what));
            }

            tx.execute(
                "INSERT INTO votes (id, target_id, target_kind, username, vote_type, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    id.to_string(),
                    target_id.to_string(),
                    target_kind.as_str(),
                    username,
                    vote_type.as_str(),
                    created_at
                ],
            )
            .map_err(|e| DbError::unique(e, "vote"))?;
            tx.commit()?;

            Ok(Vote {
                id,
                target_id: *target_id,
                target_kind,
                username: username.to_string(),
                vote_type,
                created_at,
            })
        })
    }

    /// Votes on a target split into up and down, each in insertion order.
    pub fn list_votes(&self, target_id: &Uuid) -> Result<VotesResponse> {
        let votes = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {VOTE_COLUMNS} FROM votes WHERE target_id = ?1 ORDER BY seq"
            ))?;
            let rows = stmt
                .query_map([target_id.to_string()], vote_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        let (upvotes, downvotes): (Vec<Vote>, Vec<Vote>) =
            votes.into_iter().partition(|v| v.vote_type == VoteType::Up);
        Ok(VotesResponse { upvotes, downvotes })
    }

    pub fn votes_by_user(&self, username: &str, target_id: &Uuid) -> Result<Vec<Vote>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {VOTE_COLUMNS} FROM votes WHERE username = ?1 AND target_id = ?2 ORDER BY seq"
            ))?;
            let rows = stmt
                .query_map(rusqlite::params![username, target_id.to_string()], vote_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Delete the caller's vote on a target, returning it if there was one.
    pub fn remove_vote(
        &self,
        target_kind: TargetKind,
        username: &str,
        target_id: &Uuid,
    ) -> Result<Option<Vote>> {
        self.with_conn(|conn| {
            let existing = conn
                .query_row(
                    &format!(
                        "SELECT {VOTE_COLUMNS} FROM votes
                         WHERE target_kind = ?1 AND username = ?2 AND target_id = ?3
                         ORDER BY seq LIMIT 1"
                    ),
                    rusqlite::params![target_kind.as_str(), username, target_id.to_string()],
                    vote_from_row,
                )
                .optional()?;

            if let Some(ref vote) = existing {
                conn.execute("DELETE FROM votes WHERE id = ?1", [vote.id.to_string()])?;
            }
            Ok(existing)
        })
    }

    /// Delete every vote on a target of the given kind.
    pub fn delete_votes_for_target(&self, target_kind: TargetKind, target_id: &Uuid) -> Result<usize> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM votes WHERE target_kind = ?1 AND target_id = ?2",
                rusqlite::params![target_kind.as_str(), target_id.to_string()],
            )?;
            Ok(deleted)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_vote_lands_in_its_partition() {
        let db = Database::open_in_memory().unwrap();
        let post = db.create_post("alice", "t", "b").unwrap();

        let up = db.add_vote(&post.id, TargetKind::Post, "bob", VoteType::Up).unwrap();
        let down = db.add_vote(&post.id, TargetKind::Post, "carol", VoteType::Down).unwrap();

        let votes = db.list_votes(&post.id).unwrap();
        assert_eq!(votes.upvotes, vec![up]);
        assert_eq!(votes.downvotes, vec![down]);
    }

    #[test]
    fn second_vote_by_same_user_conflicts() {
        let db = Database::open_in_memory().unwrap();
        let post = db.create_post("alice", "t", "b").unwrap();

        db.add_vote(&post.id, TargetKind::Post, "bob", VoteType::Up).unwrap();
        let err = db.add_vote(&post.id, TargetKind::Post, "bob", VoteType::Down).unwrap_err();
        assert!(matches!(err, DbError::Conflict("vote")));

        assert_eq!(db.votes_by_user("bob", &post.id).unwrap().len(), 1);
    }

    #[test]
    fn vote_target_must_exist_for_its_kind() {
        let db = Database::open_in_memory().unwrap();
        let post = db.create_post("alice", "t", "b").unwrap();

        let err = db.add_vote(&post.id, TargetKind::Comment, "bob", VoteType::Up).unwrap_err();
        assert!(matches!(err, DbError::NotFound("comment")));

        let err = db.add_vote(&Uuid::new_v4(), TargetKind::Post, "bob", VoteType::Up).unwrap_err();
        assert!(matches!(err, DbError::NotFound("post")));
    }

    #[test]
    fn remove_vote_matches_kind_user_and_target() {
        let db = Database::open_in_memory().unwrap();
        let post = db.create_post("alice", "t", "b").unwrap();
        let comment = db.create_comment(&post.id, true, "bob", "c").unwrap();

        let on_comment = db.add_vote(&comment.id, TargetKind::Comment, "bob", VoteType::Up).unwrap();

        // wrong kind and wrong user leave the vote alone
        assert!(db.remove_vote(TargetKind::Post, "bob", &comment.id).unwrap().is_none());
        assert!(db.remove_vote(TargetKind::Comment, "carol", &comment.id).unwrap().is_none());

        let removed = db.remove_vote(TargetKind::Comment, "bob", &comment.id).unwrap();
        assert_eq!(removed, Some(on_comment));
        assert!(db.remove_vote(TargetKind::Comment, "bob", &comment.id).unwrap().is_none());
    }

    #[test]
    fn bulk_delete_only_touches_the_target() {
        let db = Database::open_in_memory().unwrap();
        let a = db.create_post("alice", "a", "b").unwrap();
        let b = db.create_post("alice", "b", "b").unwrap();

        db.add_vote(&a.id, TargetKind::Post, "bob", VoteType::Up).unwrap();
        db.add_vote(&a.id, TargetKind::Post, "carol", VoteType::Down).unwrap();
        db.add_vote(&b.id, TargetKind::Post, "bob", VoteType::Up).unwrap();

        assert_eq!(db.delete_votes_for_target(TargetKind::Post, &a.id).unwrap(), 2);
        let left = db.list_votes(&a.id).unwrap();
        assert!(left.upvotes.is_empty() && left.downvotes.is_empty());
        assert_eq!(db.list_votes(&b.id).unwrap().upvotes.len(), 1);
    }

    #[test]
    fn bulk_delete_ignores_targets_of_another_kind() {
        let db = Database::open_in_memory().unwrap();
        let post = db.create_post("alice", "a", "b").unwrap();
        let comment = db.create_comment(&post.id, true, "bob", "c").unwrap();
        db.add_vote(&comment.id, TargetKind::Comment, "alice", VoteType::Up).unwrap();

        assert_eq!(db.delete_votes_for_target(TargetKind::Post, &comment.id).unwrap(), 0);
        assert_eq!(db.list_votes(&comment.id).unwrap().upvotes.len(), 1);
    }
}
