use sqlx::{PgPool, Postgres, Transaction};
use crate::models::{NewStockPrice, StockPrice};

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<StockPrice>, sqlx::Error> {
    sqlx::query_as::<_, StockPrice>(
        "SELECT id, company_id, price, captured_at
         FROM stock_prices
         ORDER BY id ASC")
        .fetch_all(pool)
        .await
}

pub async fn fetch_for_company(pool: &PgPool, company_id: i64)
-> Result<Vec<StockPrice>, sqlx::Error> {
    sqlx::query_as::<_, StockPrice>(
        "SELECT id, company_id, price, captured_at
         FROM stock_prices
         WHERE company_id = $1
         ORDER BY id ASC")
        .bind(company_id)
        .fetch_all(pool)
        .await
}

pub async fn fetch_one(pool: &PgPool, id: i64) -> Result<Option<StockPrice>, sqlx::Error> {
    sqlx::query_as::<_, StockPrice>(
        "SELECT id, company_id, price, captured_at
         FROM stock_prices
         WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn lock_one(tx: &mut Transaction<'_, Postgres>, id: i64)
-> Result<Option<StockPrice>, sqlx::Error> {
    sqlx::query_as::<_, StockPrice>(
        "SELECT id, company_id, price, captured_at
         FROM stock_prices
         WHERE id = $1
         FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

pub async fn insert(pool: &PgPool, input: NewStockPrice) -> Result<StockPrice, sqlx::Error> {
    sqlx::query_as::<_, StockPrice>(
        "INSERT INTO stock_prices (company_id, price, captured_at)
         VALUES ($1, $2, $3)
         RETURNING id, company_id, price, captured_at")
        .bind(input.company_id)
        .bind(input.price)
        .bind(input.captured_at)
        .fetch_one(pool)
        .await
}

pub async fn update(tx: &mut Transaction<'_, Postgres>, id: i64, input: NewStockPrice)
-> Result<StockPrice, sqlx::Error> {
    sqlx::query_as::<_, StockPrice>(
        "UPDATE stock_prices
         SET company_id = $2, price = $3, captured_at = $4
         WHERE id = $1
         RETURNING id, company_id, price, captured_at")
        .bind(id)
        .bind(input.company_id)
        .bind(input.price)
        .bind(input.captured_at)
        .fetch_one(&mut **tx)
        .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM stock_prices WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
