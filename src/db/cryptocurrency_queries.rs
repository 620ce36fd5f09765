use sqlx::{PgPool, Postgres, Transaction};
use crate::models::{CryptoPrice, Cryptocurrency, NewCryptocurrency};

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Cryptocurrency>, sqlx::Error> {
    sqlx::query_as::<_, Cryptocurrency>(
        "SELECT id, name, started_at, created_at, updated_at
         FROM cryptocurrencies
         ORDER BY id ASC")
        .fetch_all(pool)
        .await
}

pub async fn fetch_one(pool: &PgPool, id: i64) -> Result<Option<Cryptocurrency>, sqlx::Error> {
    sqlx::query_as::<_, Cryptocurrency>(
        "SELECT id, name, started_at, created_at, updated_at
         FROM cryptocurrencies
         WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn lock_one(tx: &mut Transaction<'_, Postgres>, id: i64)
-> Result<Option<Cryptocurrency>, sqlx::Error> {
    sqlx::query_as::<_, Cryptocurrency>(
        "SELECT id, name, started_at, created_at, updated_at
         FROM cryptocurrencies
         WHERE id = $1
         FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

#[derive(sqlx::FromRow)]
struct CryptocurrencyWithPriceRow {
    id: i64,
    name: Option<String>,
    started_at: Option<chrono::NaiveDate>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    price_id: Option<i64>,
    price: Option<bigdecimal::BigDecimal>,
    captured_at: Option<chrono::NaiveDate>,
    price_created_at: Option<chrono::DateTime<chrono::Utc>>,
    price_updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

pub async fn fetch_with_prices(pool: &PgPool, id: i64)
-> Result<Option<(Cryptocurrency, Vec<CryptoPrice>)>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CryptocurrencyWithPriceRow>(
        "SELECT c.id, c.name, c.started_at, c.created_at, c.updated_at,
                cp.id AS price_id, cp.price, cp.captured_at,
                cp.created_at AS price_created_at, cp.updated_at AS price_updated_at
         FROM cryptocurrencies c
         LEFT JOIN crypto_prices cp ON cp.cryptocurrency_id = c.id
         WHERE c.id = $1
         ORDER BY cp.id ASC")
        .bind(id)
        .fetch_all(pool)
        .await?;

    Ok(fold_rows(rows))
}

// A row only yields a price when the join matched, which sets the id and both
// timestamps together.
fn fold_rows(rows: Vec<CryptocurrencyWithPriceRow>) -> Option<(Cryptocurrency, Vec<CryptoPrice>)> {
    let first = rows.first()?;
    let crypto = Cryptocurrency {
        id: first.id,
        name: first.name.clone(),
        started_at: first.started_at,
        created_at: first.created_at,
        updated_at: first.updated_at,
    };
    let prices = rows
        .into_iter()
        .filter_map(|row| {
            let (price_id, created_at, updated_at) =
                (row.price_id?, row.price_created_at?, row.price_updated_at?);
            Some(CryptoPrice {
                id: price_id,
                price: row.price,
                cryptocurrency_id: row.id,
                captured_at: row.captured_at,
                created_at,
                updated_at,
            })
        })
        .collect();
    Some((crypto, prices))
}

pub async fn insert(pool: &PgPool, input: NewCryptocurrency) -> Result<Cryptocurrency, sqlx::Error> {
    sqlx::query_as::<_, Cryptocurrency>(
        "INSERT INTO cryptocurrencies (name, started_at)
         VALUES ($1, $2)
         RETURNING id, name, started_at, created_at, updated_at")
        .bind(input.name)
        .bind(input.started_at)
        .fetch_one(pool)
        .await
}

pub async fn update(tx: &mut Transaction<'_, Postgres>, id: i64, input: NewCryptocurrency)
-> Result<Cryptocurrency, sqlx::Error> {
    sqlx::query_as::<_, Cryptocurrency>(
        "UPDATE cryptocurrencies
         SET name = $2, started_at = $3, updated_at = NOW()
         WHERE id = $1
         RETURNING id, name, started_at, created_at, updated_at")
        .bind(id)
        .bind(input.name)
        .bind(input.started_at)
        .fetch_one(&mut **tx)
        .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cryptocurrencies WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
