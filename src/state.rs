use std::sync::Arc;

use crate::models::{Company, CryptoPrice, Cryptocurrency, StockPrice};
use crate::store::{ChildRepository, Repository, Store};

/// One backend seen through the repository of each entity kind.
#[derive(Clone)]
pub struct AppState {
    pub companies: Arc<dyn Repository<Company>>,
    pub stock_prices: Arc<dyn ChildRepository<StockPrice>>,
    pub cryptocurrencies: Arc<dyn Repository<Cryptocurrency>>,
    pub crypto_prices: Arc<dyn ChildRepository<CryptoPrice>>,
}

impl AppState {
    pub fn new<S: Store>(store: S) -> Self {
        let store = Arc::new(store);
        Self {
            companies: store.clone(),
            stock_prices: store.clone(),
            cryptocurrencies: store.clone(),
            crypto_prices: store,
        }
    }
}
