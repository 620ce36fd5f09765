pub(crate) mod companies;
pub(crate) mod cryptocurrencies;
pub(crate) mod crypto_prices;
pub(crate) mod health;
