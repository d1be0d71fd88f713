use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::info;

use forum_types::api::{AddVoteRequest, Claims, InsertResult};
use forum_types::models::{TargetKind, Vote};

use crate::error::{ApiError, parse_id};
use crate::middleware::ensure_actor;
use crate::state::AppState;
use crate::store;

/// Serves both `/votes/posts/{id}` and `/votes/comments/{id}`.
pub async fn list_votes(
    State(state): State<AppState>,
    Path(target_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let target_id = parse_id(&target_id, "target")?;
    let votes = store::run(&state, move |s| s.db.list_votes(&target_id)).await?;
    Ok(Json(votes))
}

pub async fn votes_by_user(
    State(state): State<AppState>,
    Path((username, target_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let target_id = parse_id(&target_id, "target")?;
    let votes = store::run(&state, move |s| s.db.votes_by_user(&username, &target_id)).await?;
    Ok(Json(votes))
}

pub async fn add_vote(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(req), _): WithRejection<Json<AddVoteRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_actor(&claims, req.username.as_deref())?;
    let target_id = parse_id(&req.target_id, "target")?;

    let voter = claims.username;
    let vote = store::run(&state, move |s| {
        s.db.add_vote(&target_id, req.target_kind, &voter, req.vote_type)
    })
    .await?;

    info!(
        "'{}' voted {} on {} {}",
        vote.username, vote.vote_type, vote.target_kind, vote.target_id
    );
    Ok((StatusCode::CREATED, Json(InsertResult::new(vote.id))))
}

pub async fn remove_post_vote(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((username, post_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    remove_vote(state, claims, TargetKind::Post, username, post_id).await
}

pub async fn remove_comment_vote(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((username, comment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    remove_vote(state, claims, TargetKind::Comment, username, comment_id).await
}

/// Responds with the deleted vote, or `null` when there was none.
async fn remove_vote(
    state: AppState,
    claims: Claims,
    kind: TargetKind,
    username: String,
    target_id: String,
) -> Result<Json<Option<Vote>>, ApiError> {
    ensure_actor(&claims, Some(&username))?;
    let target_id = parse_id(&target_id, kind.as_str())?;

    let removed = store::run(&state, move |s| s.db.remove_vote(kind, &username, &target_id)).await?;
    Ok(Json(removed))
}
