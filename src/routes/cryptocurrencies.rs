use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{Cryptocurrency, CryptocurrencyDetail, CryptocurrencyForm};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cryptocurrencies).post(create_cryptocurrency))
        .route("/new", get(new_cryptocurrency))
        .route(
            "/:id",
            get(show_cryptocurrency)
                .put(update_cryptocurrency)
                .patch(update_cryptocurrency)
                .delete(delete_cryptocurrency),
        )
        .route("/:id/edit", get(edit_cryptocurrency))
}

pub async fn list_cryptocurrencies(
    State(state): State<AppState>
) -> Result<Json<Vec<Cryptocurrency>>, AppError> {
    info!("GET /cryptocurrencies - Fetching all cryptocurrencies");
    let cryptos = state.cryptocurrencies.list_all().await
        .map_err(|e| {
            error!("Failed to fetch cryptocurrencies: {}", e);
            e
        })?;
    Ok(Json(cryptos))
}

pub async fn new_cryptocurrency() -> Json<CryptocurrencyForm> {
    info!("GET /cryptocurrencies/new - Blank cryptocurrency form");
    Json(CryptocurrencyForm::default())
}

pub async fn create_cryptocurrency(
    State(state): State<AppState>,
    Json(form): Json<CryptocurrencyForm>
) -> Result<(StatusCode, Json<Cryptocurrency>), AppError> {
    info!("POST /cryptocurrencies - Creating cryptocurrency");
    let crypto = state.cryptocurrencies.create(form).await
        .map_err(|e| {
            error!("Failed to create cryptocurrency: {}", e);
            e
        })?;
    info!("Cryptocurrency {} was successfully created", crypto.id);
    Ok((StatusCode::CREATED, Json(crypto)))
}

pub async fn show_cryptocurrency(
    State(state): State<AppState>,
    Path(id): Path<i64>
) -> Result<Json<CryptocurrencyDetail>, AppError> {
    info!("GET /cryptocurrencies/{} - Fetching cryptocurrency with prices", id);
    let detail = state.crypto_prices.find_with_children(id).await
        .map_err(|e| {
            error!("Failed to fetch cryptocurrency {}: {}", id, e);
            e
        })?;
    Ok(Json(CryptocurrencyDetail {
        cryptocurrency: detail.parent,
        crypto_prices: detail.children,
    }))
}

pub async fn edit_cryptocurrency(
    State(state): State<AppState>,
    Path(id): Path<i64>
) -> Result<Json<CryptocurrencyForm>, AppError> {
    info!("GET /cryptocurrencies/{}/edit - Cryptocurrency form", id);
    let crypto = state.cryptocurrencies.find_by_id(id).await
        .map_err(|e| {
            error!("Failed to fetch cryptocurrency {}: {}", id, e);
            e
        })?;
    Ok(Json(CryptocurrencyForm::from(&crypto)))
}

pub async fn update_cryptocurrency(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<CryptocurrencyForm>
) -> Result<Json<Cryptocurrency>, AppError> {
    info!("PUT /cryptocurrencies/{} - Updating cryptocurrency", id);
    let crypto = state.cryptocurrencies.update(id, form).await
        .map_err(|e| {
            error!("Failed to update cryptocurrency {}: {}", id, e);
            e
        })?;
    Ok(Json(crypto))
}

pub async fn delete_cryptocurrency(
    State(state): State<AppState>,
    Path(id): Path<i64>
) -> Result<StatusCode, AppError> {
    info!("DELETE /cryptocurrencies/{} - Deleting cryptocurrency", id);
    state.cryptocurrencies.delete(id).await
        .map_err(|e| {
            error!("Failed to delete cryptocurrency {}: {}", id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}
