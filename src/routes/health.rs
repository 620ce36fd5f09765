use axum::{routing::get, Router};

use crate::state::AppState;

/// Liveness only; the store is not consulted.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(|| async { "OK" }))
}
