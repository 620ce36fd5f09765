mod company;
mod stock_price;
mod cryptocurrency;
mod crypto_price;

pub use company::{Company, CompanyDetail, CompanyForm, NewCompany};
pub use stock_price::{NewStockPrice, StockPrice, StockPriceForm};
pub use cryptocurrency::{Cryptocurrency, CryptocurrencyDetail, CryptocurrencyForm, NewCryptocurrency};
pub use crypto_price::{CryptoPrice, CryptoPriceForm, NewCryptoPrice};

use crate::errors::AppError;

/// Unwraps a mandatory text field, rejecting absent and blank values.
pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{} can't be blank", field))),
    }
}
