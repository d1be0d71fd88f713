use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;

use forum_types::api::{AddReactionRequest, Claims, InsertResult};

use crate::error::{ApiError, parse_id, require_text};
use crate::middleware::ensure_actor;
use crate::state::AppState;
use crate::store;

pub async fn add_reaction(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(req), _): WithRejection<Json<AddReactionRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_actor(&claims, req.username.as_deref())?;
    let comment_id = parse_id(&req.comment_id, "comment")?;
    require_text(&req.kind, "kind")?;

    let username = claims.username;
    let reaction =
        store::run(&state, move |s| s.db.add_reaction(&comment_id, &username, &req.kind)).await?;

    Ok((StatusCode::CREATED, Json(InsertResult::new(reaction.id))))
}

pub async fn list_reactions(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let comment_id = parse_id(&comment_id, "comment")?;
    let reactions = store::run(&state, move |s| s.db.list_reactions(&comment_id)).await?;
    Ok(Json(reactions))
}

/// The path username must be the caller, and the store only deletes when it
/// also owns the reaction. Responds with the deleted reaction or `null`.
pub async fn remove_reaction(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((reaction_id, username)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_actor(&claims, Some(&username))?;
    let reaction_id = parse_id(&reaction_id, "reaction")?;

    let removed =
        store::run(&state, move |s| s.db.remove_reaction(&reaction_id, &username)).await?;
    Ok(Json(removed))
}
