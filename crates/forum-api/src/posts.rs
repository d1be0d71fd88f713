use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::info;

use forum_db::cascade::delete_post_cascade;
use forum_types::api::{Claims, CreatePostRequest, InsertResult, PostCascadeReport};

use crate::error::{ApiError, parse_id, require_text};
use crate::middleware::ensure_actor;
use crate::state::AppState;
use crate::store;

pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let posts = store::run(&state, |s| s.db.list_posts()).await?;
    Ok(Json(posts))
}

/// Responds with an array holding zero or one post.
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = parse_id(&post_id, "post")?;
    let post = store::run(&state, move |s| s.db.get_post(&post_id)).await?;
    Ok(Json(post.into_iter().collect::<Vec<_>>()))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(req), _): WithRejection<Json<CreatePostRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_actor(&claims, req.username.as_deref())?;
    require_text(&req.title, "title")?;
    require_text(&req.body, "body")?;

    let author = claims.username;
    let post = store::run(&state, move |s| s.db.create_post(&author, &req.title, &req.body)).await?;

    info!("Post {} created by '{}'", post.id, post.author_username);
    Ok((StatusCode::CREATED, Json(InsertResult::new(post.id))))
}

/// Only the author may delete a post. The post row is removed last, so an
/// interrupted cascade leaves it in place and the author can retry. An id with
/// no post behind it answers with an empty report and touches nothing.
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = parse_id(&post_id, "post")?;
    let actor = claims.username;

    let report = store::run(&state, move |s| -> Result<_, ApiError> {
        let Some(post) = s.db.get_post(&post_id)? else {
            return Ok(PostCascadeReport::default());
        };
        if post.author_username != actor {
            return Err(ApiError::Forbidden("only the author can delete this post"));
        }
        Ok(delete_post_cascade(&s.db, &post_id)?)
    })
    .await?;

    Ok(Json(report))
}
