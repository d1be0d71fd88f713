use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use forum_types::api::Claims;

use crate::error::ApiError;
use crate::state::AppState;

/// Extract and validate the bearer token, then expose its claims to the handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::InvalidToken)?;

    let claims = state.identity.resolve_token(token)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// A username supplied in a body or path must be the token owner's.
pub fn ensure_actor(claims: &Claims, claimed: Option<&str>) -> Result<(), ApiError> {
    match claimed {
        Some(name) if name != claims.username => {
            Err(ApiError::Forbidden("username does not match the authenticated user"))
        }
        _ => Ok(()),
    }
}
