/// Repository behaviour tests
///
/// Exercises the repository contract through the in-memory backend:
/// - list/find/create/update/delete for every entity kind
/// - eager parent+children fetch against the naive two-step read
/// - validation and reference errors leave the store untouched

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use stocktracker::errors::AppError;
use stocktracker::models::{
    Company, CompanyForm, CryptoPrice, CryptoPriceForm, Cryptocurrency, CryptocurrencyForm,
    StockPrice, StockPriceForm,
};
use stocktracker::state::AppState;
use stocktracker::store::MemoryStore;

fn state() -> AppState {
    AppState::new(MemoryStore::new())
}

fn acme() -> CompanyForm {
    CompanyForm {
        name: Some("Acme".into()),
        ticker_symbol: Some("ACM".into()),
        risk_factor: Some("low".into()),
    }
}

fn stock_price(company_id: i64, price: &str, day: u32) -> StockPriceForm {
    StockPriceForm {
        company_id: Some(company_id),
        price: Some(BigDecimal::from_str(price).unwrap()),
        captured_at: NaiveDate::from_ymd_opt(2022, 6, day),
    }
}

async fn bitcoin(state: &AppState) -> Cryptocurrency {
    state.cryptocurrencies
        .create(CryptocurrencyForm {
            name: Some("Bitcoin".into()),
            started_at: NaiveDate::from_ymd_opt(2009, 1, 3),
        })
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_created_company_is_listed() {
    let state = state();
    let company = state.companies.create(acme()).await.unwrap();

    let companies = state.companies.list_all().await.unwrap();
    assert_eq!(companies, vec![company.clone()]);
    assert_eq!(company.name, "Acme");
    assert_eq!(company.ticker_symbol, "ACM");
    assert_eq!(company.risk_factor, "low");
}

#[tokio::test]
async fn test_company_without_risk_factor_is_not_persisted() {
    let state = state();
    let form = CompanyForm { risk_factor: None, ..acme() };

    let result = state.companies.create(form).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(state.companies.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_find_unknown_id_is_not_found() {
    let state = state();
    let company = state.companies.create(acme()).await.unwrap();

    assert!(matches!(
        state.companies.find_by_id(company.id + 1).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(state.stock_prices.find_by_id(1).await, Err(AppError::NotFound(_))));
    assert!(matches!(state.cryptocurrencies.find_by_id(1).await, Err(AppError::NotFound(_))));
    assert!(matches!(state.crypto_prices.find_by_id(1).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_company_update_replaces_given_fields() {
    let state = state();
    let company = state.companies.create(acme()).await.unwrap();

    let updated = state.companies
        .update(company.id, CompanyForm { risk_factor: Some("high".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(updated.name, "Acme");
    assert_eq!(updated.risk_factor, "high");
    assert_eq!(state.companies.find_by_id(company.id).await.unwrap(), updated);
}

#[tokio::test]
async fn test_company_update_cannot_blank_a_field() {
    let state = state();
    let company = state.companies.create(acme()).await.unwrap();

    let result = state.companies
        .update(company.id, CompanyForm { name: Some(" ".into()), ..Default::default() })
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(state.companies.find_by_id(company.id).await.unwrap(), company);
}

#[tokio::test]
async fn test_update_and_delete_unknown_company() {
    let state = state();
    assert!(matches!(state.companies.update(5, acme()).await, Err(AppError::NotFound(_))));
    assert!(matches!(state.companies.delete(5).await, Err(AppError::NotFound(_))));
}

// ---------------------------------------------------------------------------
// Eager fetch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_eager_fetch_equals_two_step_fetch_for_every_company() {
    let state = state();
    let acme = state.companies.create(acme()).await.unwrap();
    let globex = state.companies
        .create(CompanyForm {
            name: Some("Globex".into()),
            ticker_symbol: Some("GLX".into()),
            risk_factor: Some("medium".into()),
        })
        .await
        .unwrap();
    let initech = state.companies
        .create(CompanyForm {
            name: Some("Initech".into()),
            ticker_symbol: Some("INI".into()),
            risk_factor: Some("high".into()),
        })
        .await
        .unwrap();

    for (company_id, price, day) in [
        (acme.id, "10.10", 1),
        (globex.id, "55", 1),
        (acme.id, "10.35", 2),
        (globex.id, "54.20", 2),
        (acme.id, "9.95", 3),
    ] {
        state.stock_prices.create(stock_price(company_id, price, day)).await.unwrap();
    }

    for company in state.companies.list_all().await.unwrap() {
        let eager = state.stock_prices.find_with_children(company.id).await.unwrap();

        let parent = state.companies.find_by_id(company.id).await.unwrap();
        let children = state.stock_prices.list_children(parent.id).await.unwrap();

        assert_eq!(eager.parent, parent);
        assert_eq!(eager.children, children);
        assert!(eager.children.iter().all(|p: &StockPrice| p.company_id == company.id));
    }

    let acme_prices = state.stock_prices.list_children(acme.id).await.unwrap();
    assert_eq!(acme_prices.len(), 3);
    assert!(state.stock_prices.list_children(initech.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_eager_fetch_of_unknown_parent_is_not_found() {
    let state = state();
    assert!(matches!(
        state.stock_prices.find_with_children(1).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        state.crypto_prices.find_with_children(1).await,
        Err(AppError::NotFound(_))
    ));
}

// ---------------------------------------------------------------------------
// Cryptocurrencies and crypto prices
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_empty_store_lists_nothing() {
    let state = state();
    let cryptos: Vec<Cryptocurrency> = state.cryptocurrencies.list_all().await.unwrap();
    assert!(cryptos.is_empty());
    let prices: Vec<CryptoPrice> = state.crypto_prices.list_all().await.unwrap();
    assert!(prices.is_empty());
}

#[tokio::test]
async fn test_deleted_crypto_price_is_not_found() {
    let state = state();
    let btc = bitcoin(&state).await;
    let price = state.crypto_prices
        .create(CryptoPriceForm {
            price: Some(BigDecimal::from_str("20280.64").unwrap()),
            cryptocurrency_id: Some(btc.id),
            captured_at: NaiveDate::from_ymd_opt(2022, 6, 29),
        })
        .await
        .unwrap();

    state.crypto_prices.delete(price.id).await.unwrap();

    assert!(matches!(state.crypto_prices.find_by_id(price.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(state.crypto_prices.delete(price.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_crypto_price_requires_existing_cryptocurrency() {
    let state = state();

    let missing = state.crypto_prices.create(CryptoPriceForm::default()).await;
    assert!(matches!(missing, Err(AppError::Validation(_))));

    let dangling = state.crypto_prices
        .create(CryptoPriceForm { cryptocurrency_id: Some(404), ..Default::default() })
        .await;
    match dangling {
        Err(AppError::Validation(msg)) => assert_eq!(msg, "Cryptocurrency must exist"),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(state.crypto_prices.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_crypto_price_update_keeps_omitted_fields() {
    let state = state();
    let btc = bitcoin(&state).await;
    let price = state.crypto_prices
        .create(CryptoPriceForm {
            price: Some(BigDecimal::from_str("19000").unwrap()),
            cryptocurrency_id: Some(btc.id),
            captured_at: NaiveDate::from_ymd_opt(2022, 6, 29),
        })
        .await
        .unwrap();

    let updated = state.crypto_prices
        .update(price.id, CryptoPriceForm {
            price: Some(BigDecimal::from_str("19250.5").unwrap()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.price, Some(BigDecimal::from_str("19250.5").unwrap()));
    assert_eq!(updated.cryptocurrency_id, btc.id);
    assert_eq!(updated.captured_at, price.captured_at);
    assert_eq!(updated.created_at, price.created_at);
}

#[tokio::test]
async fn test_parent_delete_is_restricted_while_prices_exist() {
    let state = state();
    let company: Company = state.companies.create(acme()).await.unwrap();
    let price = state.stock_prices.create(stock_price(company.id, "1", 1)).await.unwrap();

    assert!(matches!(state.companies.delete(company.id).await, Err(AppError::Conflict(_))));
    assert_eq!(state.companies.find_by_id(company.id).await.unwrap(), company);

    state.stock_prices.delete(price.id).await.unwrap();
    state.companies.delete(company.id).await.unwrap();
    assert!(state.companies.list_all().await.unwrap().is_empty());
}
