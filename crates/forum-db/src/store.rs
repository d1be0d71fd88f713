use forum_types::models::{Comment, Post, TargetKind};
use uuid::Uuid;

use crate::{Database, Result};

/// The store operations a cascade is built from. Every method is a single,
/// independently committed step that is safe to repeat.
pub trait CascadeStore {
    /// Direct children of a post.
    fn comments_for_post(&self, post_id: &Uuid) -> Result<Vec<Comment>>;
    fn delete_reactions_for_comment(&self, comment_id: &Uuid) -> Result<usize>;
    fn delete_comment(&self, comment_id: &Uuid) -> Result<Option<Comment>>;
    fn delete_votes_for_target(&self, target_kind: TargetKind, target_id: &Uuid) -> Result<usize>;
    fn delete_post(&self, post_id: &Uuid) -> Result<Option<Post>>;
}

impl CascadeStore for Database {
    fn comments_for_post(&self, post_id: &Uuid) -> Result<Vec<Comment>> {
        Database::list_comments_for_post(self, post_id)
    }

    fn delete_reactions_for_comment(&self, comment_id: &Uuid) -> Result<usize> {
        Database::delete_reactions_for_comment(self, comment_id)
    }

    fn delete_comment(&self, comment_id: &Uuid) -> Result<Option<Comment>> {
        Database::delete_comment(self, comment_id)
    }

    fn delete_votes_for_target(&self, target_kind: TargetKind, target_id: &Uuid) -> Result<usize> {
        Database::delete_votes_for_target(self, target_kind, target_id)
    }

    fn delete_post(&self, post_id: &Uuid) -> Result<Option<Post>> {
        Database::delete_post(self, post_id)
    }
}
