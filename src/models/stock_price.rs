use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

// Historical share price of a company on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StockPrice {
    pub id: i64,
    pub company_id: i64,
    pub price: Option<BigDecimal>,
    pub captured_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockPriceForm {
    pub company_id: Option<i64>,
    pub price: Option<BigDecimal>,
    pub captured_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStockPrice {
    pub company_id: i64,
    pub price: Option<BigDecimal>,
    pub captured_at: Option<NaiveDate>,
}

impl StockPriceForm {
    pub fn validate(self) -> Result<NewStockPrice, AppError> {
        let company_id = self
            .company_id
            .ok_or_else(|| AppError::Validation("Company must exist".into()))?;
        Ok(NewStockPrice {
            company_id,
            price: self.price,
            captured_at: self.captured_at,
        })
    }

    pub fn merged_with(self, current: &StockPrice) -> Self {
        Self {
            company_id: self.company_id.or(Some(current.company_id)),
            price: self.price.or_else(|| current.price.clone()),
            captured_at: self.captured_at.or(current.captured_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_company_is_required() {
        let form = StockPriceForm {
            price: Some(BigDecimal::from_str("12.50").unwrap()),
            ..Default::default()
        };
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_price_and_date_are_optional() {
        let form = StockPriceForm { company_id: Some(3), ..Default::default() };
        let price = form.validate().unwrap();
        assert_eq!(price.company_id, 3);
        assert!(price.price.is_none());
        assert!(price.captured_at.is_none());
    }

    #[test]
    fn test_price_deserializes_from_string_and_date() {
        let form: StockPriceForm = serde_json::from_str(
            r#"{"company_id": 1, "price": "101.25", "captured_at": "2022-06-27"}"#,
        )
        .unwrap();
        assert_eq!(form.price, Some(BigDecimal::from_str("101.25").unwrap()));
        assert_eq!(form.captured_at, NaiveDate::from_ymd_opt(2022, 6, 27));
    }
}
