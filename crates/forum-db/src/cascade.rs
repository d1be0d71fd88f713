//! Multi-step deletions.
//!
//! A cascade is a sequence of store calls, each committed on its own. There is
//! no surrounding transaction: if a step fails, the steps before it stay done
//! and the error reports how far the cascade got. Every step is idempotent, so
//! running the same cascade again finishes the job.

use std::fmt;

use forum_types::api::{CommentCascadeReport, PostCascadeReport};
use forum_types::models::TargetKind;
use tracing::{error, info};
use uuid::Uuid;

use crate::DbError;
use crate::store::CascadeStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStep {
    ListComments,
    DeleteReactions,
    DeleteComment,
    DeleteVotes,
    DeletePost,
}

impl fmt::Display for CascadeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ListComments => "list comments",
            Self::DeleteReactions => "delete reactions",
            Self::DeleteComment => "delete comment",
            Self::DeleteVotes => "delete votes",
            Self::DeletePost => "delete post",
        };
        f.write_str(name)
    }
}

/// A cascade that stopped early. `progress` holds what was deleted before `step` failed.
#[derive(Debug)]
pub struct CascadeError<R> {
    pub step: CascadeStep,
    pub progress: R,
    /// True when at least one deletion was committed before the failure.
    pub partial: bool,
    pub source: DbError,
}

impl<R> fmt::Display for CascadeError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.partial { "partial cascade" } else { "cascade failed" };
        write!(f, "{} at step '{}': {}", kind, self.step, self.source)
    }
}

impl<R: fmt::Debug> std::error::Error for CascadeError<R> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Delete a post, its direct comments, their reactions, and the post's votes.
///
/// Replies to comments are not visited. Votes on the deleted comments are left
/// in place, the same as [`delete_comment_cascade`].
pub fn delete_post_cascade<S>(
    store: &S,
    post_id: &Uuid,
) -> Result<PostCascadeReport, CascadeError<PostCascadeReport>>
where
    S: CascadeStore + ?Sized,
{
    let mut report = PostCascadeReport::default();

    let comments = store
        .comments_for_post(post_id)
        .map_err(|e| post_stopped(post_id, CascadeStep::ListComments, report.clone(), e))?;

    for comment in &comments {
        let reactions = store
            .delete_reactions_for_comment(&comment.id)
            .map_err(|e| post_stopped(post_id, CascadeStep::DeleteReactions, report.clone(), e))?;
        report.reactions_deleted += reactions;

        let removed = store
            .delete_comment(&comment.id)
            .map_err(|e| post_stopped(post_id, CascadeStep::DeleteComment, report.clone(), e))?;
        if removed.is_some() {
            report.comments_deleted += 1;
        }
    }

    report.votes_deleted = store
        .delete_votes_for_target(TargetKind::Post, post_id)
        .map_err(|e| post_stopped(post_id, CascadeStep::DeleteVotes, report.clone(), e))?;

    report.post = store
        .delete_post(post_id)
        .map_err(|e| post_stopped(post_id, CascadeStep::DeletePost, report.clone(), e))?;

    info!(
        %post_id,
        comments = report.comments_deleted,
        reactions = report.reactions_deleted,
        votes = report.votes_deleted,
        found = report.post.is_some(),
        "Post cascade complete"
    );
    Ok(report)
}

/// Delete a comment and its reactions. Votes on the comment are not touched.
pub fn delete_comment_cascade<S>(
    store: &S,
    comment_id: &Uuid,
) -> Result<CommentCascadeReport, CascadeError<CommentCascadeReport>>
where
    S: CascadeStore + ?Sized,
{
    let mut report = CommentCascadeReport::default();

    report.reactions_deleted = store
        .delete_reactions_for_comment(comment_id)
        .map_err(|e| comment_stopped(comment_id, CascadeStep::DeleteReactions, report.clone(), e))?;

    report.comment = store
        .delete_comment(comment_id)
        .map_err(|e| comment_stopped(comment_id, CascadeStep::DeleteComment, report.clone(), e))?;

    info!(
        %comment_id,
        reactions = report.reactions_deleted,
        found = report.comment.is_some(),
        "Comment cascade complete"
    );
    Ok(report)
}

fn post_stopped(
    post_id: &Uuid,
    step: CascadeStep,
    progress: PostCascadeReport,
    source: DbError,
) -> CascadeError<PostCascadeReport> {
    let partial = !progress.is_empty();
    if partial {
        error!(
            %post_id,
            %step,
            comments = progress.comments_deleted,
            reactions = progress.reactions_deleted,
            votes = progress.votes_deleted,
            "Partial post cascade, earlier deletions remain committed: {}",
            source
        );
    } else {
        error!(%post_id, %step, "Post cascade failed before deleting anything: {}", source);
    }
    CascadeError { step, progress, partial, source }
}

fn comment_stopped(
    comment_id: &Uuid,
    step: CascadeStep,
    progress: CommentCascadeReport,
    source: DbError,
) -> CascadeError<CommentCascadeReport> {
    let partial = !progress.is_empty();
    if partial {
        error!(
            %comment_id,
            %step,
            reactions = progress.reactions_deleted,
            "Partial comment cascade, earlier deletions remain committed: {}",
            source
        );
    } else {
        error!(%comment_id, %step, "Comment cascade failed before deleting anything: {}", source);
    }
    CascadeError { step, progress, partial, source }
}
