use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes::{companies, crypto_prices, cryptocurrencies, health};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/", get(companies::list_companies))
        .nest("/health", health::router())
        .nest("/companies", companies::router())
        .nest("/cryptocurrencies", cryptocurrencies::router())
        .nest("/crypto_prices", crypto_prices::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
