use sqlx::{PgPool, Postgres, Transaction};
use crate::models::{Company, NewCompany, StockPrice};

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        "SELECT id, name, ticker_symbol, risk_factor
         FROM companies
         ORDER BY id ASC")
        .fetch_all(pool)
        .await
}

pub async fn fetch_one(pool: &PgPool, id: i64) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        "SELECT id, name, ticker_symbol, risk_factor
         FROM companies
         WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn lock_one(tx: &mut Transaction<'_, Postgres>, id: i64)
-> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        "SELECT id, name, ticker_symbol, risk_factor
         FROM companies
         WHERE id = $1
         FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

/// Flat row of the company/stock price join; price columns are null for a
/// company without prices.
#[derive(sqlx::FromRow)]
struct CompanyWithPriceRow {
    id: i64,
    name: String,
    ticker_symbol: String,
    risk_factor: String,
    price_id: Option<i64>,
    price: Option<bigdecimal::BigDecimal>,
    captured_at: Option<chrono::NaiveDate>,
}

/// Company and its stock prices in one round trip.
pub async fn fetch_with_prices(pool: &PgPool, id: i64)
-> Result<Option<(Company, Vec<StockPrice>)>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CompanyWithPriceRow>(
        "SELECT c.id, c.name, c.ticker_symbol, c.risk_factor,
                sp.id AS price_id, sp.price, sp.captured_at
         FROM companies c
         LEFT JOIN stock_prices sp ON sp.company_id = c.id
         WHERE c.id = $1
         ORDER BY sp.id ASC")
        .bind(id)
        .fetch_all(pool)
        .await?;

    Ok(fold_rows(rows))
}

/// Rebuilds the company from the first joined row and one price per row that
/// matched. `None` when the company does not exist.
fn fold_rows(rows: Vec<CompanyWithPriceRow>) -> Option<(Company, Vec<StockPrice>)> {
    let first = rows.first()?;
    let company = Company {
        id: first.id,
        name: first.name.clone(),
        ticker_symbol: first.ticker_symbol.clone(),
        risk_factor: first.risk_factor.clone(),
    };
    let prices = rows
        .into_iter()
        .filter_map(|row| {
            row.price_id.map(|price_id| StockPrice {
                id: price_id,
                company_id: row.id,
                price: row.price,
                captured_at: row.captured_at,
            })
        })
        .collect();
    Some((company, prices))
}

pub async fn insert(pool: &PgPool, input: NewCompany) -> Result<Company, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        "INSERT INTO companies (name, ticker_symbol, risk_factor)
         VALUES ($1, $2, $3)
         RETURNING id, name, ticker_symbol, risk_factor")
        .bind(input.name)
        .bind(input.ticker_symbol)
        .bind(input.risk_factor)
        .fetch_one(pool)
        .await
}

pub async fn update(tx: &mut Transaction<'_, Postgres>, id: i64, input: NewCompany)
-> Result<Company, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        "UPDATE companies
         SET name = $2, ticker_symbol = $3, risk_factor = $4
         WHERE id = $1
         RETURNING id, name, ticker_symbol, risk_factor")
        .bind(id)
        .bind(input.name)
        .bind(input.ticker_symbol)
        .bind(input.risk_factor)
        .fetch_one(&mut **tx)
        .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    use super::*;

    fn row(price: Option<(i64, &str, u32)>) -> CompanyWithPriceRow {
        CompanyWithPriceRow {
            id: 3,
            name: "Acme".into(),
            ticker_symbol: "ACM".into(),
            risk_factor: "low".into(),
            price_id: price.map(|(id, _, _)| id),
            price: price.map(|(_, p, _)| BigDecimal::from_str(p).unwrap()),
            captured_at: price.and_then(|(_, _, day)| NaiveDate::from_ymd_opt(2022, 6, day)),
        }
    }

    #[test]
    fn test_no_rows_means_no_company() {
        assert!(fold_rows(vec![]).is_none());
    }

    #[test]
    fn test_company_without_prices_has_empty_history() {
        let (company, prices) = fold_rows(vec![row(None)]).unwrap();
        assert_eq!(company.id, 3);
        assert_eq!(company.ticker_symbol, "ACM");
        assert!(prices.is_empty());
    }

    #[test]
    fn test_prices_keep_row_order_and_parent_id() {
        let rows = vec![
            row(Some((4, "10.10", 1))),
            row(Some((9, "10.35", 2))),
            row(Some((12, "9.95", 3))),
        ];
        let (company, prices) = fold_rows(rows).unwrap();

        assert_eq!(company.name, "Acme");
        assert_eq!(prices.iter().map(|p| p.id).collect::<Vec<_>>(), vec![4, 9, 12]);
        assert!(prices.iter().all(|p| p.company_id == 3));
        assert_eq!(prices[1].price, Some(BigDecimal::from_str("10.35").unwrap()));
        assert_eq!(prices[2].captured_at, NaiveDate::from_ymd_opt(2022, 6, 3));
    }
}
