use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::errors::AppError;
use crate::models::{
    Company, CryptoPrice, Cryptocurrency, NewCompany, NewCryptoPrice, NewCryptocurrency,
    NewStockPrice, StockPrice,
};
use crate::store::{
    has_dependents, not_found, parent_missing, ChildEntity, ChildRepository, Entity, Repository,
    WithChildren,
};

/// In-process backend holding every table behind one lock. It enforces the
/// same reference rules as the database schema: a price needs its parent and a
/// parent with prices cannot be deleted.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Default)]
pub struct Tables {
    companies: Table<Company>,
    stock_prices: Table<StockPrice>,
    cryptocurrencies: Table<Cryptocurrency>,
    crypto_prices: Table<CryptoPrice>,
}

// Ids come from a per-table sequence, so key order is insertion order.
pub struct Table<E> {
    rows: BTreeMap<i64, E>,
    last_id: i64,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self { rows: BTreeMap::new(), last_id: 0 }
    }
}

impl<E> Table<E> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Row construction and reference rules for each table.
pub trait MemoryEntity: Entity {
    fn table(tables: &Tables) -> &Table<Self>;
    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// Builds the stored row; `previous` is set on update.
    fn build(id: i64, draft: Self::Draft, previous: Option<&Self>, now: DateTime<Utc>) -> Self;

    fn check_references(_tables: &Tables, _draft: &Self::Draft) -> Result<(), AppError> {
        Ok(())
    }

    fn check_dependents(_tables: &Tables, _id: i64) -> Result<(), AppError> {
        Ok(())
    }
}

fn parent_exists<C>(tables: &Tables, draft: &C::Draft) -> Result<(), AppError>
where
    C: ChildEntity,
    C::Parent: MemoryEntity,
{
    let parent_id = C::draft_parent_id(draft);
    if <C::Parent as MemoryEntity>::table(tables).rows.contains_key(&parent_id) {
        Ok(())
    } else {
        Err(parent_missing::<C>())
    }
}

fn no_children<C>(tables: &Tables, parent_id: i64) -> Result<(), AppError>
where
    C: ChildEntity + MemoryEntity,
{
    if C::table(tables).rows.values().any(|row| row.parent_id() == parent_id) {
        Err(has_dependents::<C::Parent>(parent_id))
    } else {
        Ok(())
    }
}

impl MemoryEntity for Company {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.companies
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.companies
    }

    fn build(id: i64, draft: NewCompany, _previous: Option<&Self>, _now: DateTime<Utc>) -> Self {
        Company {
            id,
            name: draft.name,
            ticker_symbol: draft.ticker_symbol,
            risk_factor: draft.risk_factor,
        }
    }

    fn check_dependents(tables: &Tables, id: i64) -> Result<(), AppError> {
        no_children::<StockPrice>(tables, id)
    }
}

impl MemoryEntity for StockPrice {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.stock_prices
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.stock_prices
    }

    fn build(id: i64, draft: NewStockPrice, _previous: Option<&Self>, _now: DateTime<Utc>) -> Self {
        StockPrice {
            id,
            company_id: draft.company_id,
            price: draft.price,
            captured_at: draft.captured_at,
        }
    }

    fn check_references(tables: &Tables, draft: &NewStockPrice) -> Result<(), AppError> {
        parent_exists::<StockPrice>(tables, draft)
    }
}

impl MemoryEntity for Cryptocurrency {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.cryptocurrencies
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.cryptocurrencies
    }

    fn build(id: i64, draft: NewCryptocurrency, previous: Option<&Self>, now: DateTime<Utc>) -> Self {
        Cryptocurrency {
            id,
            name: draft.name,
            started_at: draft.started_at,
            created_at: previous.map_or(now, |p| p.created_at),
            updated_at: now,
        }
    }

    fn check_dependents(tables: &Tables, id: i64) -> Result<(), AppError> {
        no_children::<CryptoPrice>(tables, id)
    }
}

impl MemoryEntity for CryptoPrice {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.crypto_prices
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.crypto_prices
    }

    fn build(id: i64, draft: NewCryptoPrice, previous: Option<&Self>, now: DateTime<Utc>) -> Self {
        CryptoPrice {
            id,
            price: draft.price,
            cryptocurrency_id: draft.cryptocurrency_id,
            captured_at: draft.captured_at,
            created_at: previous.map_or(now, |p| p.created_at),
            updated_at: now,
        }
    }

    fn check_references(tables: &Tables, draft: &NewCryptoPrice) -> Result<(), AppError> {
        parent_exists::<CryptoPrice>(tables, draft)
    }
}

#[async_trait]
impl<E: MemoryEntity> Repository<E> for MemoryStore {
    async fn list_all(&self) -> Result<Vec<E>, AppError> {
        let tables = self.tables.read();
        Ok(E::table(&tables).rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<E, AppError> {
        let tables = self.tables.read();
        E::table(&tables).rows.get(&id).cloned().ok_or_else(|| not_found::<E>(id))
    }

    async fn create(&self, form: E::Form) -> Result<E, AppError> {
        let draft = E::validate(form)?;
        let mut tables = self.tables.write();
        E::check_references(&tables, &draft)?;

        let table = E::table_mut(&mut tables);
        let id = table.next_id();
        let row = E::build(id, draft, None, Utc::now());
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, form: E::Form) -> Result<E, AppError> {
        let mut tables = self.tables.write();
        let current = E::table(&tables).rows.get(&id).cloned().ok_or_else(|| not_found::<E>(id))?;
        let draft = E::validate(E::merge(form, &current))?;
        E::check_references(&tables, &draft)?;

        let row = E::build(id, draft, Some(&current), Utc::now());
        E::table_mut(&mut tables).rows.insert(id, row.clone());
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write();
        if !E::table(&tables).rows.contains_key(&id) {
            return Err(not_found::<E>(id));
        }
        E::check_dependents(&tables, id)?;
        E::table_mut(&mut tables).rows.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl<C> ChildRepository<C> for MemoryStore
where
    C: ChildEntity + MemoryEntity,
    C::Parent: MemoryEntity,
{
    async fn list_children(&self, parent_id: i64) -> Result<Vec<C>, AppError> {
        let tables = self.tables.read();
        Ok(children_of::<C>(&tables, parent_id))
    }

    async fn find_with_children(
        &self,
        parent_id: i64,
    ) -> Result<WithChildren<C::Parent, C>, AppError> {
        let tables = self.tables.read();
        let parent = <C::Parent as MemoryEntity>::table(&tables)
            .rows
            .get(&parent_id)
            .cloned()
            .ok_or_else(|| not_found::<C::Parent>(parent_id))?;
        let children = children_of::<C>(&tables, parent_id);
        Ok(WithChildren { parent, children })
    }
}

fn children_of<C: ChildEntity + MemoryEntity>(tables: &Tables, parent_id: i64) -> Vec<C> {
    C::table(tables)
        .rows
        .values()
        .filter(|row| row.parent_id() == parent_id)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyForm, CryptoPriceForm, CryptocurrencyForm, StockPriceForm};
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn company_form(name: &str, ticker: &str) -> CompanyForm {
        CompanyForm {
            name: Some(name.into()),
            ticker_symbol: Some(ticker.into()),
            risk_factor: Some("low".into()),
        }
    }

    fn price_form(company_id: i64, price: &str, day: u32) -> StockPriceForm {
        StockPriceForm {
            company_id: Some(company_id),
            price: Some(BigDecimal::from_str(price).unwrap()),
            captured_at: NaiveDate::from_ymd_opt(2022, 6, day),
        }
    }

    #[tokio::test]
    async fn test_ids_follow_insertion_order() {
        let store = MemoryStore::new();
        let a: Company = store.create(company_form("Acme", "ACM")).await.unwrap();
        let b: Company = store.create(company_form("Globex", "GLX")).await.unwrap();
        assert!(a.id < b.id);

        let all: Vec<Company> = store.list_all().await.unwrap();
        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Globex"]);
    }

    #[tokio::test]
    async fn test_eager_fetch_matches_list_children() {
        let store = MemoryStore::new();
        let acme: Company = store.create(company_form("Acme", "ACM")).await.unwrap();
        let globex: Company = store.create(company_form("Globex", "GLX")).await.unwrap();
        for (company, price, day) in [(acme.id, "10.5", 1), (globex.id, "7", 1), (acme.id, "11", 2)] {
            let _: StockPrice = store.create(price_form(company, price, day)).await.unwrap();
        }

        for company in [&acme, &globex] {
            let eager: WithChildren<Company, StockPrice> =
                store.find_with_children(company.id).await.unwrap();
            let naive: Vec<StockPrice> = store.list_children(company.id).await.unwrap();
            assert_eq!(&eager.parent, company);
            assert_eq!(eager.children, naive);
            assert!(eager.children.iter().all(|p| p.company_id == company.id));
        }
    }

    #[tokio::test]
    async fn test_price_for_unknown_parent_is_rejected() {
        let store = MemoryStore::new();
        let result: Result<StockPrice, _> = store.create(price_form(42, "1", 1)).await;
        match result {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Company must exist"),
            other => panic!("expected validation error, got {:?}", other),
        }
        let prices: Vec<StockPrice> = store.list_all().await.unwrap();
        assert!(prices.is_empty());
    }

    #[tokio::test]
    async fn test_parent_with_prices_cannot_be_deleted() {
        let store = MemoryStore::new();
        let btc: Cryptocurrency = store
            .create(CryptocurrencyForm { name: Some("Bitcoin".into()), started_at: None })
            .await
            .unwrap();
        let price: CryptoPrice = store
            .create(CryptoPriceForm { cryptocurrency_id: Some(btc.id), ..Default::default() })
            .await
            .unwrap();

        let blocked = Repository::<Cryptocurrency>::delete(&store, btc.id).await;
        assert!(matches!(blocked, Err(AppError::Conflict(_))));

        Repository::<CryptoPrice>::delete(&store, price.id).await.unwrap();
        Repository::<Cryptocurrency>::delete(&store, btc.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_keeps_created_at_and_refreshes_updated_at() {
        let store = MemoryStore::new();
        let btc: Cryptocurrency = store
            .create(CryptocurrencyForm { name: Some("Bitcoin".into()), started_at: None })
            .await
            .unwrap();

        let updated: Cryptocurrency = store
            .update(btc.id, CryptocurrencyForm {
                name: None,
                started_at: NaiveDate::from_ymd_opt(2009, 1, 3),
            })
            .await
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("Bitcoin"));
        assert_eq!(updated.created_at, btc.created_at);
        assert!(updated.updated_at >= btc.updated_at);
    }

    #[tokio::test]
    async fn test_moving_price_to_unknown_parent_is_rejected() {
        let store = MemoryStore::new();
        let acme: Company = store.create(company_form("Acme", "ACM")).await.unwrap();
        let price: StockPrice = store.create(price_form(acme.id, "3", 4)).await.unwrap();

        let moved: Result<StockPrice, _> = store
            .update(price.id, StockPriceForm { company_id: Some(99), ..Default::default() })
            .await;
        assert!(matches!(moved, Err(AppError::Validation(_))));

        let unchanged: StockPrice = store.find_by_id(price.id).await.unwrap();
        assert_eq!(unchanged, price);
    }
}
