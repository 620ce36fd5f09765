use sqlx::{PgPool, Postgres, Transaction};
use crate::models::{CryptoPrice, NewCryptoPrice};

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<CryptoPrice>, sqlx::Error> {
    sqlx::query_as::<_, CryptoPrice>(
        "SELECT id, price, cryptocurrency_id, captured_at, created_at, updated_at
         FROM crypto_prices
         ORDER BY id ASC")
        .fetch_all(pool)
        .await
}

pub async fn fetch_for_cryptocurrency(pool: &PgPool, cryptocurrency_id: i64)
-> Result<Vec<CryptoPrice>, sqlx::Error> {
    sqlx::query_as::<_, CryptoPrice>(
        "SELECT id, price, cryptocurrency_id, captured_at, created_at, updated_at
         FROM crypto_prices
         WHERE cryptocurrency_id = $1
         ORDER BY id ASC")
        .bind(cryptocurrency_id)
        .fetch_all(pool)
        .await
}

pub async fn fetch_one(pool: &PgPool, id: i64) -> Result<Option<CryptoPrice>, sqlx::Error> {
    sqlx::query_as::<_, CryptoPrice>(
        "SELECT id, price, cryptocurrency_id, captured_at, created_at, updated_at
         FROM crypto_prices
         WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn lock_one(tx: &mut Transaction<'_, Postgres>, id: i64)
-> Result<Option<CryptoPrice>, sqlx::Error> {
    sqlx::query_as::<_, CryptoPrice>(
        "SELECT id, price, cryptocurrency_id, captured_at, created_at, updated_at
         FROM crypto_prices
         WHERE id = $1
         FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

pub async fn insert(pool: &PgPool, input: NewCryptoPrice) -> Result<CryptoPrice, sqlx::Error> {
    sqlx::query_as::<_, CryptoPrice>(
        "INSERT INTO crypto_prices (price, cryptocurrency_id, captured_at)
         VALUES ($1, $2, $3)
         RETURNING id, price, cryptocurrency_id, captured_at, created_at, updated_at")
        .bind(input.price)
        .bind(input.cryptocurrency_id)
        .bind(input.captured_at)
        .fetch_one(pool)
        .await
}

pub async fn update(tx: &mut Transaction<'_, Postgres>, id: i64, input: NewCryptoPrice)
-> Result<CryptoPrice, sqlx::Error> {
    sqlx::query_as::<_, CryptoPrice>(
        "UPDATE crypto_prices
         SET price = $2, cryptocurrency_id = $3, captured_at = $4, updated_at = NOW()
         WHERE id = $1
         RETURNING id, price, cryptocurrency_id, captured_at, created_at, updated_at")
        .bind(id)
        .bind(input.price)
        .bind(input.cryptocurrency_id)
        .bind(input.captured_at)
        .fetch_one(&mut **tx)
        .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM crypto_prices WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
