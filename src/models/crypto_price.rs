use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

// Historical price of a cryptocurrency on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CryptoPrice {
    pub id: i64,
    pub price: Option<BigDecimal>,
    pub cryptocurrency_id: i64,
    pub captured_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CryptoPriceForm {
    pub price: Option<BigDecimal>,
    pub cryptocurrency_id: Option<i64>,
    pub captured_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCryptoPrice {
    pub price: Option<BigDecimal>,
    pub cryptocurrency_id: i64,
    pub captured_at: Option<NaiveDate>,
}

impl CryptoPriceForm {
    pub fn validate(self) -> Result<NewCryptoPrice, AppError> {
        let cryptocurrency_id = self
            .cryptocurrency_id
            .ok_or_else(|| AppError::Validation("Cryptocurrency must exist".into()))?;
        Ok(NewCryptoPrice {
            price: self.price,
            cryptocurrency_id,
            captured_at: self.captured_at,
        })
    }

    pub fn merged_with(self, current: &CryptoPrice) -> Self {
        Self {
            price: self.price.or_else(|| current.price.clone()),
            cryptocurrency_id: self.cryptocurrency_id.or(Some(current.cryptocurrency_id)),
            captured_at: self.captured_at.or(current.captured_at),
        }
    }
}

impl From<&CryptoPrice> for CryptoPriceForm {
    fn from(price: &CryptoPrice) -> Self {
        Self {
            price: price.price.clone(),
            cryptocurrency_id: Some(price.cryptocurrency_id),
            captured_at: price.captured_at,
        }
    }
}
