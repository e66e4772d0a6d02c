//! Wallet store.

use bigdecimal::BigDecimal;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::error::Result;
use crate::models::wallet::validate_label;
use crate::models::{Ordering, Wallet, WalletFilter, WalletId, WalletSortField};
use crate::utils::pagination::PageRequest;

const WALLET_COLUMNS: &str = "id, label, balance, created_at, updated_at";

/// Insert a wallet with a zero balance.
pub async fn create(pool: &PgPool, label: Option<&str>) -> Result<Wallet> {
    let label = validate_label(label)?;

    let wallet = sqlx::query_as::<_, Wallet>(&format!(
        r#"
        INSERT INTO wallets (id, label, balance, created_at, updated_at)
        VALUES ($1, $2, 0, NOW(), NOW())
        RETURNING {}
        "#,
        WALLET_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(&label)
    .fetch_one(pool)
    .await?;

    tracing::info!(wallet_id = %wallet.id, "Wallet created");
    Ok(wallet)
}

pub async fn get(pool: &PgPool, id: WalletId) -> Result<Option<Wallet>> {
    let wallet = sqlx::query_as::<_, Wallet>(&format!(
        "SELECT {} FROM wallets WHERE id = $1",
        WALLET_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(wallet)
}

pub async fn exists(pool: &PgPool, id: WalletId) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM wallets WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// One page of wallets plus the filtered total.
pub async fn list(
    pool: &PgPool,
    filter: &WalletFilter,
    ordering: Ordering<WalletSortField>,
    page: PageRequest,
) -> Result<(Vec<Wallet>, i64)> {
    let mut count_query: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM wallets WHERE 1=1");
    push_filter(&mut count_query, filter);
    let count: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut query: QueryBuilder<'_, Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM wallets WHERE 1=1", WALLET_COLUMNS));
    push_filter(&mut query, filter);
    query.push(" ORDER BY ");
    query.push(ordering.to_sql());
    query.push(" LIMIT ");
    query.push_bind(page.limit());
    query.push(" OFFSET ");
    query.push_bind(page.offset());

    let wallets = query.build_query_as::<Wallet>().fetch_all(pool).await?;
    Ok((wallets, count))
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &WalletFilter) {
    if let Some(label) = &filter.label {
        query.push(" AND label = ");
        query.push_bind(label.clone());
    }
}

/// Replace the label. Balance and id are never touched here.
pub async fn update_label(pool: &PgPool, id: WalletId, label: Option<&str>) -> Result<Option<Wallet>> {
    let label = validate_label(label)?;

    let wallet = sqlx::query_as::<_, Wallet>(&format!(
        r#"
        UPDATE wallets SET label = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING {}
        "#,
        WALLET_COLUMNS
    ))
    .bind(&label)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if wallet.is_some() {
        tracing::info!(wallet_id = %id, "Wallet label updated");
    }
    Ok(wallet)
}

/// Delete a wallet. Its transactions go with it (ON DELETE CASCADE).
/// Returns false if there was no such wallet.
pub async fn delete(pool: &PgPool, id: WalletId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM wallets WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    let deleted = result.rows_affected() > 0;
    if deleted {
        tracing::info!(wallet_id = %id, "Wallet deleted");
    }
    Ok(deleted)
}

/// A wallet whose cached balance disagrees with its transactions.
#[derive(Clone, Debug, PartialEq)]
pub struct BalanceDrift {
    pub wallet_id: WalletId,
    pub label: String,
    pub balance: BigDecimal,
    pub expected: BigDecimal,
}

pub async fn find_balance_drift(pool: &PgPool) -> Result<Vec<BalanceDrift>> {
    let rows = sqlx::query(
        r#"
        SELECT w.id, w.label, w.balance, COALESCE(SUM(t.amount), 0) AS expected
        FROM wallets w
        LEFT JOIN transactions t ON t.wallet_id = w.id
        GROUP BY w.id, w.label, w.balance
        HAVING w.balance <> COALESCE(SUM(t.amount), 0)
        ORDER BY w.created_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(BalanceDrift {
                wallet_id: row.try_get("id")?,
                label: row.try_get("label")?,
                balance: row.try_get("balance")?,
                expected: row.try_get("expected")?,
            })
        })
        .collect()
}

/// Reset the cached balance to the sum of the wallet's transactions.
/// Holds the wallet row lock so it cannot interleave with a transaction insert.
pub async fn recompute_balance(pool: &PgPool, id: WalletId) -> Result<Option<BigDecimal>> {
    let mut tx = pool.begin().await?;

    let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM wallets WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if locked.is_none() {
        return Ok(None);
    }

    let balance = sqlx::query_scalar::<_, BigDecimal>(
        r#"
        UPDATE wallets
        SET balance = (SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE wallet_id = $1),
            updated_at = NOW()
        WHERE id = $1
        RETURNING balance
        "#,
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(wallet_id = %id, %balance, "Wallet balance recomputed");
    Ok(Some(balance))
}
