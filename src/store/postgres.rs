use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::db;
use crate::errors::AppError;
use crate::models::{
    Company, CompanyForm, CryptoPrice, CryptoPriceForm, Cryptocurrency, CryptocurrencyForm,
    StockPrice, StockPriceForm,
};
use crate::store::{not_found, ChildRepository, Entity, Repository, WithChildren};

/// PostgreSQL backend. Every call runs on its own pooled connection and
/// commits on its own.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn deleted<E: Entity>(rows: u64, id: i64) -> Result<(), AppError> {
    match rows {
        0 => Err(not_found::<E>(id)),
        _ => Ok(()),
    }
}

#[async_trait]
impl Repository<Company> for PgStore {
    async fn list_all(&self) -> Result<Vec<Company>, AppError> {
        Ok(db::company_queries::fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Company, AppError> {
        db::company_queries::fetch_one(&self.pool, id).await?
            .ok_or_else(|| not_found::<Company>(id))
    }

    async fn create(&self, form: CompanyForm) -> Result<Company, AppError> {
        let input = form.validate()?;
        let company = db::company_queries::insert(&self.pool, input).await?;
        debug!("Inserted company {}", company.id);
        Ok(company)
    }

    async fn update(&self, id: i64, form: CompanyForm) -> Result<Company, AppError> {
        let mut tx = self.pool.begin().await?;
        let current = db::company_queries::lock_one(&mut tx, id).await?
            .ok_or_else(|| not_found::<Company>(id))?;
        let input = form.merged_with(&current).validate()?;
        let company = db::company_queries::update(&mut tx, id, input).await?;
        tx.commit().await?;
        Ok(company)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let rows = db::company_queries::delete(&self.pool, id).await
            .map_err(|e| AppError::on_delete(e, &format!("{} {}", Company::KIND, id)))?;
        deleted::<Company>(rows, id)
    }
}

#[async_trait]
impl Repository<StockPrice> for PgStore {
    async fn list_all(&self) -> Result<Vec<StockPrice>, AppError> {
        Ok(db::stock_price_queries::fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<StockPrice, AppError> {
        db::stock_price_queries::fetch_one(&self.pool, id).await?
            .ok_or_else(|| not_found::<StockPrice>(id))
    }

    async fn create(&self, form: StockPriceForm) -> Result<StockPrice, AppError> {
        let input = form.validate()?;
        db::stock_price_queries::insert(&self.pool, input).await
            .map_err(|e| AppError::on_write(e, "Company"))
    }

    async fn update(&self, id: i64, form: StockPriceForm) -> Result<StockPrice, AppError> {
        let mut tx = self.pool.begin().await?;
        let current = db::stock_price_queries::lock_one(&mut tx, id).await?
            .ok_or_else(|| not_found::<StockPrice>(id))?;
        let input = form.merged_with(&current).validate()?;
        let price = db::stock_price_queries::update(&mut tx, id, input).await
            .map_err(|e| AppError::on_write(e, "Company"))?;
        tx.commit().await?;
        Ok(price)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let rows = db::stock_price_queries::delete(&self.pool, id).await?;
        deleted::<StockPrice>(rows, id)
    }
}

#[async_trait]
impl ChildRepository<StockPrice> for PgStore {
    async fn list_children(&self, company_id: i64) -> Result<Vec<StockPrice>, AppError> {
        Ok(db::stock_price_queries::fetch_for_company(&self.pool, company_id).await?)
    }

    async fn find_with_children(
        &self,
        company_id: i64,
    ) -> Result<WithChildren<Company, StockPrice>, AppError> {
        let (company, prices) = db::company_queries::fetch_with_prices(&self.pool, company_id)
            .await?
            .ok_or_else(|| not_found::<Company>(company_id))?;
        Ok(WithChildren { parent: company, children: prices })
    }
}

#[async_trait]
impl Repository<Cryptocurrency> for PgStore {
    async fn list_all(&self) -> Result<Vec<Cryptocurrency>, AppError> {
        Ok(db::cryptocurrency_queries::fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Cryptocurrency, AppError> {
        db::cryptocurrency_queries::fetch_one(&self.pool, id).await?
            .ok_or_else(|| not_found::<Cryptocurrency>(id))
    }

    async fn create(&self, form: CryptocurrencyForm) -> Result<Cryptocurrency, AppError> {
        let input = form.validate()?;
        Ok(db::cryptocurrency_queries::insert(&self.pool, input).await?)
    }

    async fn update(&self, id: i64, form: CryptocurrencyForm) -> Result<Cryptocurrency, AppError> {
        let mut tx = self.pool.begin().await?;
        let current = db::cryptocurrency_queries::lock_one(&mut tx, id).await?
            .ok_or_else(|| not_found::<Cryptocurrency>(id))?;
        let input = form.merged_with(&current).validate()?;
        let crypto = db::cryptocurrency_queries::update(&mut tx, id, input).await?;
        tx.commit().await?;
        Ok(crypto)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let rows = db::cryptocurrency_queries::delete(&self.pool, id).await
            .map_err(|e| AppError::on_delete(e, &format!("{} {}", Cryptocurrency::KIND, id)))?;
        deleted::<Cryptocurrency>(rows, id)
    }
}

#[async_trait]
impl Repository<CryptoPrice> for PgStore {
    async fn list_all(&self) -> Result<Vec<CryptoPrice>, AppError> {
        Ok(db::crypto_price_queries::fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<CryptoPrice, AppError> {
        db::crypto_price_queries::fetch_one(&self.pool, id).await?
            .ok_or_else(|| not_found::<CryptoPrice>(id))
    }

    async fn create(&self, form: CryptoPriceForm) -> Result<CryptoPrice, AppError> {
        let input = form.validate()?;
        db::crypto_price_queries::insert(&self.pool, input).await
            .map_err(|e| AppError::on_write(e, "Cryptocurrency"))
    }

    async fn update(&self, id: i64, form: CryptoPriceForm) -> Result<CryptoPrice, AppError> {
        let mut tx = self.pool.begin().await?;
        let current = db::crypto_price_queries::lock_one(&mut tx, id).await?
            .ok_or_else(|| not_found::<CryptoPrice>(id))?;
        let input = form.merged_with(&current).validate()?;
        let price = db::crypto_price_queries::update(&mut tx, id, input).await
            .map_err(|e| AppError::on_write(e, "Cryptocurrency"))?;
        tx.commit().await?;
        Ok(price)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let rows = db::crypto_price_queries::delete(&self.pool, id).await?;
        deleted::<CryptoPrice>(rows, id)
    }
}

#[async_trait]
impl ChildRepository<CryptoPrice> for PgStore {
    async fn list_children(&self, cryptocurrency_id: i64) -> Result<Vec<CryptoPrice>, AppError> {
        Ok(db::crypto_price_queries::fetch_for_cryptocurrency(&self.pool, cryptocurrency_id).await?)
    }

    async fn find_with_children(
        &self,
        cryptocurrency_id: i64,
    ) -> Result<WithChildren<Cryptocurrency, CryptoPrice>, AppError> {
        let (crypto, prices) =
            db::cryptocurrency_queries::fetch_with_prices(&self.pool, cryptocurrency_id)
                .await?
                .ok_or_else(|| not_found::<Cryptocurrency>(cryptocurrency_id))?;
        Ok(WithChildren { parent: crypto, children: prices })
    }
}
