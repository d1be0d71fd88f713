use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::info;

use forum_db::cascade::delete_comment_cascade;
use forum_types::api::{
    Claims, CommentCascadeReport, CommentsResponse, CreateCommentRequest, InsertResult,
};

use crate::error::{ApiError, parse_id, require_text};
use crate::middleware::ensure_actor;
use crate::state::AppState;
use crate::store;

pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = parse_id(&post_id, "post")?;
    let comments = store::run(&state, move |s| s.db.list_comments_for_post(&post_id)).await?;
    Ok(Json(CommentsResponse::from(comments)))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(req), _): WithRejection<Json<CreateCommentRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_actor(&claims, req.username.as_deref())?;
    let parent_id = parse_id(&req.parent_id, "parent")?;
    require_text(&req.body, "body")?;

    let author = claims.username;
    let comment = store::run(&state, move |s| {
        s.db.create_comment(&parent_id, req.parent_is_post, &author, &req.body)
    })
    .await?;

    info!(
        "Comment {} by '{}' under {}",
        comment.id, comment.author_username, comment.parent_id
    );
    Ok((StatusCode::CREATED, Json(InsertResult::new(comment.id))))
}

/// Only the author may delete a comment. Deleting an absent comment answers
/// with an empty report.
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(comment_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let comment_id = parse_id(&comment_id, "comment")?;
    let actor = claims.username;

    let report = store::run(&state, move |s| -> Result<_, ApiError> {
        let Some(comment) = s.db.get_comment(&comment_id)? else {
            return Ok(CommentCascadeReport::default());
        };
        if comment.author_username != actor {
            return Err(ApiError::Forbidden("only the author can delete this comment"));
        }
        Ok(delete_comment_cascade(&s.db, &comment_id)?)
    })
    .await?;

    Ok(Json(report))
}
