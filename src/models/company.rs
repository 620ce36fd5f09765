use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::{required, StockPrice};

// A listed company whose share price is tracked through StockPrice rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub ticker_symbol: String,
    pub risk_factor: String,
}

/// Wire form used for both create and update. Every field is optional so a
/// missing value is reported as a validation error instead of a body rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyForm {
    pub name: Option<String>,
    pub ticker_symbol: Option<String>,
    pub risk_factor: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCompany {
    pub name: String,
    pub ticker_symbol: String,
    pub risk_factor: String,
}

impl CompanyForm {
    pub fn validate(self) -> Result<NewCompany, AppError> {
        Ok(NewCompany {
            name: required(self.name, "name")?,
            ticker_symbol: required(self.ticker_symbol, "ticker_symbol")?,
            risk_factor: required(self.risk_factor, "risk_factor")?,
        })
    }

    /// Fills the fields left out of an update with the stored values.
    pub fn merged_with(self, current: &Company) -> Self {
        Self {
            name: self.name.or_else(|| Some(current.name.clone())),
            ticker_symbol: self.ticker_symbol.or_else(|| Some(current.ticker_symbol.clone())),
            risk_factor: self.risk_factor.or_else(|| Some(current.risk_factor.clone())),
        }
    }
}

/// Company detail view: the company with its full price history attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub stock_prices: Vec<StockPrice>,
}
