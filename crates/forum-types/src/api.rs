use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Comment, Post, TargetKind, Vote, VoteType};

// -- JWT Claims --

/// Bearer token claims, shared by the identity service and the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub iat: usize,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsernameResponse {
    pub username: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateDescriptionRequest {
    pub username: String,
    pub description: String,
}

/// Outcome of an overwrite: `modified` is 0 when the stored value was already equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub matched: usize,
    pub modified: usize,
}

// -- Inserts --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

impl InsertResult {
    pub fn new(inserted_id: Uuid) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

// -- Content --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Optional; when present it must name the token owner.
    #[serde(default)]
    pub username: Option<String>,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub username: Option<String>,
    pub parent_id: String,
    #[serde(alias = "parentPost")]
    pub parent_is_post: bool,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
    #[serde(rename = "commentUsernames")]
    pub comment_usernames: Vec<String>,
}

impl From<Vec<Comment>> for CommentsResponse {
    fn from(comments: Vec<Comment>) -> Self {
        let comment_usernames = comments.iter().map(|c| c.author_username.clone()).collect();
        Self {
            comments,
            comment_usernames,
        }
    }
}

// -- Engagement --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AddVoteRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(alias = "postId")]
    pub target_id: String,
    #[serde(default = "default_target_kind")]
    pub target_kind: TargetKind,
    #[serde(rename = "type")]
    pub vote_type: VoteType,
}

fn default_target_kind() -> TargetKind {
    TargetKind::Post
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VotesResponse {
    pub upvotes: Vec<Vote>,
    pub downvotes: Vec<Vote>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AddReactionRequest {
    #[serde(default)]
    pub username: Option<String>,
    pub comment_id: String,
    #[serde(alias = "reaction")]
    pub kind: String,
}

// -- Cascades --

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCascadeReport {
    /// The removed post, `None` when it was already gone.
    pub post: Option<Post>,
    pub comments_deleted: usize,
    pub reactions_deleted: usize,
    pub votes_deleted: usize,
}

impl PostCascadeReport {
    pub fn is_empty(&self) -> bool {
        self.post.is_none()
            && self.comments_deleted == 0
            && self.reactions_deleted == 0
            && self.votes_deleted == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCascadeReport {
    pub comment: Option<Comment>,
    pub reactions_deleted: usize,
}

impl CommentCascadeReport {
    pub fn is_empty(&self) -> bool {
        self.comment.is_none() && self.reactions_deleted == 0
    }
}
