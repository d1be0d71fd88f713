use axum::{
    Json, Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::require_auth;
use crate::state::AppState;
use crate::{auth, comments, posts, reactions, votes};

/// Build the full HTTP surface. Forum routes live under `/api`; reads are
/// public and every mutation goes through [`require_auth`].
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/version", get(version))
        .route("/auth/user/exists/{username}", get(auth::user_exists))
        .route("/auth/user/signup", post(auth::signup))
        .route("/auth/user/signin", post(auth::signin))
        .route("/auth/user/detailsbytoken", post(auth::details_by_token))
        .route("/auth/user/detailsbyusername/{username}", get(auth::details_by_username))
        .route("/posts", get(posts::list_posts))
        .route("/posts/{post_id}", get(posts::get_post))
        .route("/posts/comments/{post_id}", get(comments::list_comments))
        .route("/votes/posts/{post_id}", get(votes::list_votes))
        .route("/votes/comments/{comment_id}", get(votes::list_votes))
        .route("/votes/{username}/{target_id}", get(votes::votes_by_user))
        .route("/reaction/{comment_id}", get(reactions::list_reactions));

    let protected_routes = Router::new()
        .route("/auth/user/description", put(auth::update_description))
        .route("/posts/add", post(posts::create_post))
        .route("/posts/comments/add", post(comments::create_comment))
        .route("/posts/del/{post_id}", delete(posts::delete_post))
        .route("/posts/comments/del/{comment_id}", delete(comments::delete_comment))
        .route("/votes/add", post(votes::add_vote))
        .route("/votes/posts/del/{username}/{post_id}", delete(votes::remove_post_vote))
        .route(
            "/votes/comments/del/{username}/{comment_id}",
            delete(votes::remove_comment_vote),
        )
        .route("/reaction/add", post(reactions::add_reaction))
        .route("/reaction/del/{reaction_id}/{username}", delete(reactions::remove_reaction))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
