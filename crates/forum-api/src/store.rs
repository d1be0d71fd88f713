use tracing::{error, warn};

use crate::error::ApiError;
use crate::state::{AppState, AppStateInner};

/// Run a blocking store operation off the async runtime, bounded by the
/// configured store timeout.
///
/// On timeout the request fails with [`ApiError::StoreUnavailable`]; the
/// blocking call itself runs to completion in the background.
pub async fn run<F, T, E>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    let inner = state.clone();
    let task = tokio::task::spawn_blocking(move || op(&inner));

    match tokio::time::timeout(state.store_timeout, task).await {
        Ok(Ok(result)) => result.map_err(Into::into),
        Ok(Err(e)) => {
            error!("spawn_blocking join error: {}", e);
            Err(ApiError::Internal)
        }
        Err(_) => {
            warn!("Store call exceeded {:?}", state.store_timeout);
            Err(ApiError::StoreUnavailable)
        }
    }
}
