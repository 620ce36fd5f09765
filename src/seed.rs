use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{Duration, NaiveDate, Utc};
use tracing::info;

use crate::errors::AppError;
use crate::models::{CompanyForm, CryptoPriceForm, CryptocurrencyForm, StockPriceForm};
use crate::state::AppState;

const HISTORY_DAYS: i64 = 5;

const COMPANIES: &[(&str, &str, &str, &str)] = &[
    ("Apple", "AAPL", "low", "141.66"),
    ("Tesla", "TSLA", "high", "697.99"),
    ("Coca-Cola", "KO", "low", "62.91"),
];

const CRYPTOCURRENCIES: &[(&str, (i32, u32, u32), &str)] = &[
    ("Bitcoin", (2009, 1, 3), "20280.64"),
    ("Ethereum", (2015, 7, 30), "1098.71"),
];

/// Loads sample companies, cryptocurrencies and a few days of prices. Does
/// nothing when a company already exists.
pub async fn run(state: &AppState) -> Result<(), AppError> {
    if !state.companies.list_all().await?.is_empty() {
        info!("Store already has companies, skipping seed data");
        return Ok(());
    }

    let today = Utc::now().date_naive();

    for (name, ticker, risk, close) in COMPANIES {
        let company = state.companies
            .create(CompanyForm {
                name: Some(name.to_string()),
                ticker_symbol: Some(ticker.to_string()),
                risk_factor: Some(risk.to_string()),
            })
            .await?;
        for (captured_at, price) in history(close, today)? {
            state.stock_prices
                .create(StockPriceForm {
                    company_id: Some(company.id),
                    price: Some(price),
                    captured_at: Some(captured_at),
                })
                .await?;
        }
    }

    for (name, (y, m, d), close) in CRYPTOCURRENCIES {
        let crypto = state.cryptocurrencies
            .create(CryptocurrencyForm {
                name: Some(name.to_string()),
                started_at: NaiveDate::from_ymd_opt(*y, *m, *d),
            })
            .await?;
        for (captured_at, price) in history(close, today)? {
            state.crypto_prices
                .create(CryptoPriceForm {
                    price: Some(price),
                    cryptocurrency_id: Some(crypto.id),
                    captured_at: Some(captured_at),
                })
                .await?;
        }
    }

    info!(
        "Seeded {} companies and {} cryptocurrencies",
        COMPANIES.len(),
        CRYPTOCURRENCIES.len()
    );
    Ok(())
}

/// Daily closes ending today at `last_close`, oldest first. Every other day
/// closes one percent higher.
fn history(last_close: &str, today: NaiveDate) -> Result<Vec<(NaiveDate, BigDecimal)>, AppError> {
    let close = decimal(last_close)?;
    let up = decimal("1.01")?;

    let mut points: Vec<_> = (0..HISTORY_DAYS)
        .map(|i| {
            let price = if i % 2 == 0 { close.clone() } else { (&close * &up).round(2) };
            (today - Duration::days(i), price)
        })
        .collect();
    points.reverse();
    Ok(points)
}

fn decimal(value: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(value)
        .map_err(|e| AppError::Validation(format!("Invalid seed price {}: {}", value, e)))
}
