pub mod company_queries;
pub mod stock_price_queries;
pub mod cryptocurrency_queries;
pub mod crypto_price_queries;
