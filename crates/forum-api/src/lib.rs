pub mod auth;
pub mod comments;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod posts;
pub mod reactions;
pub mod routes;
pub mod state;
pub mod store;
pub mod votes;

pub use error::ApiError;
pub use state::{AppState, AppStateInner};
