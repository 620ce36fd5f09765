use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{CryptoPrice, CryptoPriceForm};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_crypto_prices).post(create_crypto_price))
        .route("/new", get(new_crypto_price))
        .route(
            "/:id",
            get(show_crypto_price)
                .put(update_crypto_price)
                .patch(update_crypto_price)
                .delete(delete_crypto_price),
        )
        .route("/:id/edit", get(edit_crypto_price))
}

pub async fn list_crypto_prices(
    State(state): State<AppState>
) -> Result<Json<Vec<CryptoPrice>>, AppError> {
    info!("GET /crypto_prices - Fetching all crypto prices");
    let prices = state.crypto_prices.list_all().await
        .map_err(|e| {
            error!("Failed to fetch crypto prices: {}", e);
            e
        })?;
    Ok(Json(prices))
}

pub async fn new_crypto_price() -> Json<CryptoPriceForm> {
    info!("GET /crypto_prices/new - Blank crypto price form");
    Json(CryptoPriceForm::default())
}

pub async fn create_crypto_price(
    State(state): State<AppState>,
    Json(form): Json<CryptoPriceForm>
) -> Result<(StatusCode, Json<CryptoPrice>), AppError> {
    info!("POST /crypto_prices - Creating crypto price");
    let price = state.crypto_prices.create(form).await
        .map_err(|e| {
            error!("Failed to create crypto price: {}", e);
            e
        })?;
    info!("Crypto price {} was successfully created", price.id);
    Ok((StatusCode::CREATED, Json(price)))
}

pub async fn show_crypto_price(
    State(state): State<AppState>,
    Path(id): Path<i64>
) -> Result<Json<CryptoPrice>, AppError> {
    info!("GET /crypto_prices/{} - Fetching crypto price", id);
    let price = state.crypto_prices.find_by_id(id).await
        .map_err(|e| {
            error!("Failed to fetch crypto price {}: {}", id, e);
            e
        })?;
    Ok(Json(price))
}

pub async fn edit_crypto_price(
    State(state): State<AppState>,
    Path(id): Path<i64>
) -> Result<Json<CryptoPriceForm>, AppError> {
    info!("GET /crypto_prices/{}/edit - Crypto price form", id);
    let price = state.crypto_prices.find_by_id(id).await
        .map_err(|e| {
            error!("Failed to fetch crypto price {}: {}", id, e);
            e
        })?;
    Ok(Json(CryptoPriceForm::from(&price)))
}

pub async fn update_crypto_price(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<CryptoPriceForm>
) -> Result<Json<CryptoPrice>, AppError> {
    info!("PUT /crypto_prices/{} - Updating crypto price", id);
    let price = state.crypto_prices.update(id, form).await
        .map_err(|e| {
            error!("Failed to update crypto price {}: {}", id, e);
            e
        })?;
    Ok(Json(price))
}

pub async fn delete_crypto_price(
    State(state): State<AppState>,
    Path(id): Path<i64>
) -> Result<StatusCode, AppError> {
    info!("DELETE /crypto_prices/{} - Deleting crypto price", id);
    state.crypto_prices.delete(id).await
        .map_err(|e| {
            error!("Failed to delete crypto price {}: {}", id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}
