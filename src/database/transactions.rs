//! Transaction store and the atomic balance update.

use bigdecimal::BigDecimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{
    Ordering, Transaction, TransactionFilter, TransactionSortField, Txid, WalletId,
};
use crate::utils::decimal;
use crate::utils::pagination::PageRequest;

const TRANSACTION_COLUMNS: &str = "id, txid, amount, wallet_id, created_at";

/// How many fresh txids to try before giving up on a unique collision.
const TXID_ATTEMPTS: usize = 3;

/// SQLSTATE numeric_value_out_of_range.
const NUMERIC_OVERFLOW: &str = "22003";

/// Record a transaction and add its amount to the wallet balance.
///
/// Both writes share one database transaction. The wallet row is locked
/// first (`FOR UPDATE`), so concurrent postings to the same wallet are
/// serialized and none of them is lost. Any error before `commit` drops
/// `tx`, which rolls back the insert and the balance change together.
pub async fn create(pool: &PgPool, wallet_id: WalletId, amount: BigDecimal) -> Result<Transaction> {
    create_with_txids(pool, wallet_id, amount, Uuid::new_v4).await
}

/// `create` with the txid generator supplied by the caller. Each insert
/// attempt draws one txid; a value already in use is retried with the next.
pub async fn create_with_txids<F>(
    pool: &PgPool,
    wallet_id: WalletId,
    amount: BigDecimal,
    mut next_txid: F,
) -> Result<Transaction>
where
    F: FnMut() -> Txid + Send,
{
    let mut tx = pool.begin().await?;

    let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM wallets WHERE id = $1 FOR UPDATE")
        .bind(wallet_id)
        .fetch_optional(&mut *tx)
        .await?;
    if locked.is_none() {
        return Err(ApiError::validation(
            "wallet",
            format!("Invalid pk \"{}\" - object does not exist.", wallet_id),
        ));
    }

    let mut inserted = None;
    for attempt in 1..=TXID_ATTEMPTS {
        // ON CONFLICT keeps the database transaction usable after a collision.
        let row = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO transactions (id, txid, amount, wallet_id, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (txid) DO NOTHING
            RETURNING {}
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(next_txid())
        .bind(&amount)
        .bind(wallet_id)
        .fetch_optional(&mut *tx)
        .await?;

        if row.is_some() {
            inserted = row;
            break;
        }
        tracing::warn!(%wallet_id, attempt, "txid collision, regenerating");
    }
    let transaction = inserted.ok_or_else(|| {
        ApiError::Conflict("Could not allocate a unique txid, please retry".to_string())
    })?;

    sqlx::query("UPDATE wallets SET balance = balance + $1, updated_at = NOW() WHERE id = $2")
        .bind(&amount)
        .bind(wallet_id)
        .execute(&mut *tx)
        .await
        .map_err(balance_overflow)?;

    tx.commit().await?;

    tracing::info!(
        %wallet_id,
        txid = %transaction.txid,
        amount = %transaction.amount,
        "Transaction recorded"
    );
    Ok(transaction)
}

/// A balance pushed past NUMERIC(30,18) is rejected input, not a server fault.
fn balance_overflow(err: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(NUMERIC_OVERFLOW) {
            return ApiError::validation(
                "amount",
                format!(
                    "Ensure that the resulting balance has no more than {} digits before the decimal point.",
                    decimal::MAX_DIGITS - decimal::DECIMAL_PLACES
                ),
            );
        }
    }
    ApiError::Database(err)
}

/// Look a transaction up by its public txid. The primary id never matches here.
pub async fn get_by_txid(pool: &PgPool, txid: Txid) -> Result<Option<Transaction>> {
    let transaction = sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {} FROM transactions WHERE txid = $1",
        TRANSACTION_COLUMNS
    ))
    .bind(txid)
    .fetch_optional(pool)
    .await?;
    Ok(transaction)
}

/// One page of transactions across all wallets plus the filtered total.
pub async fn list(
    pool: &PgPool,
    filter: &TransactionFilter,
    ordering: Ordering<TransactionSortField>,
    page: PageRequest,
) -> Result<(Vec<Transaction>, i64)> {
    let mut count_query: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM transactions WHERE 1=1");
    push_filter(&mut count_query, filter);
    let count: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
        "SELECT {} FROM transactions WHERE 1=1",
        TRANSACTION_COLUMNS
    ));
    push_filter(&mut query, filter);
    push_page(&mut query, ordering, page);

    let transactions = query.build_query_as::<Transaction>().fetch_all(pool).await?;
    Ok((transactions, count))
}

/// One page of a single wallet's transactions, newest first.
pub async fn list_for_wallet(
    pool: &PgPool,
    wallet_id: WalletId,
    page: PageRequest,
) -> Result<(Vec<Transaction>, i64)> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE wallet_id = $1")
        .bind(wallet_id)
        .fetch_one(pool)
        .await?;

    let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
        "SELECT {} FROM transactions WHERE wallet_id = ",
        TRANSACTION_COLUMNS
    ));
    query.push_bind(wallet_id);
    push_page(&mut query, Ordering::desc(TransactionSortField::CreatedAt), page);

    let transactions = query.build_query_as::<Transaction>().fetch_all(pool).await?;
    Ok((transactions, count))
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &TransactionFilter) {
    if let Some(min_amount) = &filter.min_amount {
        query.push(" AND amount >= ");
        query.push_bind(min_amount.clone());
    }
    if let Some(max_amount) = &filter.max_amount {
        query.push(" AND amount <= ");
        query.push_bind(max_amount.clone());
    }
}

fn push_page(
    query: &mut QueryBuilder<'_, Postgres>,
    ordering: Ordering<TransactionSortField>,
    page: PageRequest,
) {
    query.push(" ORDER BY ");
    query.push(ordering.to_sql());
    query.push(" LIMIT ");
    query.push_bind(page.limit());
    query.push(" OFFSET ");
    query.push_bind(page.offset());
}
