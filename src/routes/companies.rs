use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{Company, CompanyDetail};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_companies))
        .route("/:id", get(show_company))
}

pub async fn list_companies(
    State(state): State<AppState>
) -> Result<Json<Vec<Company>>, AppError> {
    info!("GET /companies - Fetching all companies");
    let companies = state.companies.list_all().await
        .map_err(|e| {
            error!("Failed to fetch companies: {}", e);
            e
        })?;
    Ok(Json(companies))
}

/// Company with its stock prices, read in one go.
pub async fn show_company(
    State(state): State<AppState>,
    Path(id): Path<i64>
) -> Result<Json<CompanyDetail>, AppError> {
    info!("GET /companies/{} - Fetching company with stock prices", id);
    let detail = state.stock_prices.find_with_children(id).await
        .map_err(|e| {
            error!("Failed to fetch company {}: {}", id, e);
            e
        })?;
    Ok(Json(CompanyDetail {
        company: detail.parent,
        stock_prices: detail.children,
    }))
}
