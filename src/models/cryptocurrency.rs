use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::CryptoPrice;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Cryptocurrency {
    pub id: i64,
    pub name: Option<String>,
    pub started_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CryptocurrencyForm {
    pub name: Option<String>,
    pub started_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCryptocurrency {
    pub name: Option<String>,
    pub started_at: Option<NaiveDate>,
}

impl CryptocurrencyForm {
    /// Neither column is constrained, so every form is accepted as given.
    pub fn validate(self) -> Result<NewCryptocurrency, AppError> {
        Ok(NewCryptocurrency {
            name: self.name,
            started_at: self.started_at,
        })
    }

    pub fn merged_with(self, current: &Cryptocurrency) -> Self {
        Self {
            name: self.name.or_else(|| current.name.clone()),
            started_at: self.started_at.or(current.started_at),
        }
    }
}

impl From<&Cryptocurrency> for CryptocurrencyForm {
    fn from(crypto: &Cryptocurrency) -> Self {
        Self {
            name: crypto.name.clone(),
            started_at: crypto.started_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptocurrencyDetail {
    #[serde(flatten)]
    pub cryptocurrency: Cryptocurrency,
    pub crypto_prices: Vec<CryptoPrice>,
}
