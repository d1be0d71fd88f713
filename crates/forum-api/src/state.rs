use std::sync::Arc;
use std::time::Duration;

use forum_db::Database;

use crate::identity::Identity;

pub type AppState = Arc<AppStateInner>;

/// Everything a request needs, built once at startup and handed to every handler.
pub struct AppStateInner {
    pub db: Database,
    pub identity: Identity,
    /// Upper bound on a single store call before the request gives up.
    pub store_timeout: Duration,
}

impl AppStateInner {
    pub fn new(db: Database, identity: Identity, store_timeout: Duration) -> AppState {
        Arc::new(Self {
            db,
            identity,
            store_timeout,
        })
    }
}
