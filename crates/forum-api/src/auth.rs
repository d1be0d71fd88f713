use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use tracing::info;

use forum_types::api::{
    Claims, InsertResult, SigninRequest, SignupRequest, TokenRequest, TokenResponse,
    UpdateDescriptionRequest, UsernameResponse,
};

use crate::error::ApiError;
use crate::middleware::ensure_actor;
use crate::state::AppState;
use crate::store;

pub async fn user_exists(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let exists = store::run(&state, move |s| s.db.user_exists(&username)).await?;
    Ok(Json(exists))
}

/// Answers `false` with 409 when the username is taken.
pub async fn signup(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<SignupRequest>, ApiError>,
) -> Result<Response, ApiError> {
    let username = req.username.clone();
    let registered = store::run(&state, move |s| {
        s.identity
            .register(&s.db, &req.username, &req.password, req.description.as_deref())
    })
    .await;

    match registered {
        Ok(user_id) => {
            info!("Registered user '{}' ({})", username, user_id);
            Ok((StatusCode::CREATED, Json(InsertResult::new(user_id))).into_response())
        }
        Err(ApiError::Conflict(_)) => Ok((StatusCode::CONFLICT, Json(false)).into_response()),
        Err(e) => Err(e),
    }
}

pub async fn signin(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<SigninRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let token = store::run(&state, move |s| {
        s.identity.authenticate(&s.db, &req.username, &req.password)
    })
    .await?;

    Ok(Json(TokenResponse { token }))
}

pub async fn details_by_token(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<TokenRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let claims = state.identity.resolve_token(&req.token)?;
    Ok(Json(UsernameResponse {
        username: claims.username,
    }))
}

pub async fn details_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = store::run(&state, move |s| s.identity.profile(&s.db, &username)).await?;
    Ok(Json(profile))
}

pub async fn update_description(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateDescriptionRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_actor(&claims, Some(&req.username))?;

    let result = store::run(&state, move |s| {
        s.identity
            .update_description(&s.db, &req.username, &req.description)
    })
    .await?;

    Ok(Json(result))
}
