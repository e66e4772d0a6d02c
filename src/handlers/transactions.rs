use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use bigdecimal::BigDecimal;
use serde::Deserialize;

use crate::database::transactions as transaction_store;
use crate::error::{ApiError, Result};
use crate::models::ids::{parse_field_id, parse_path_id};
use crate::models::{Ordering, Transaction, TransactionFilter, TransactionSortField};
use crate::utils::decimal;
use crate::utils::pagination::{Page, PageRequest};
use crate::AppState;

const TRANSACTION_NOT_FOUND: &str = "A transaction with this txid does not exist";

#[derive(Debug, Default, Deserialize)]
pub struct TransactionListQuery {
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub wallet: Option<String>,
    /// String ("13.3") or number (13.3); defaults to 0.
    pub amount: Option<serde_json::Value>,
}

/// GET /transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    query: std::result::Result<Query<TransactionListQuery>, QueryRejection>,
) -> Result<Json<Page<Transaction>>> {
    let Query(params) = query?;
    let filter =
        TransactionFilter::from_query(params.min_amount.as_deref(), params.max_amount.as_deref())?;
    let ordering = Ordering::parse(
        params.ordering.as_deref(),
        Ordering::desc(TransactionSortField::CreatedAt),
    )?;
    let page = PageRequest::from_query(params.page.as_deref(), state.config.page_size)?;

    let (transactions, count) =
        transaction_store::list(&state.db_pool, &filter, ordering, page).await?;
    Ok(Json(Page::new(transactions, count, page, &uri)))
}

/// POST /transactions
pub async fn create_transaction(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>)> {
    let Json(payload) = payload?;

    let wallet_id = payload
        .wallet
        .as_deref()
        .ok_or_else(|| ApiError::validation("wallet", "This field is required."))
        .and_then(|raw| parse_field_id(raw, "wallet"))?;

    let amount = match &payload.amount {
        None => BigDecimal::from(0_i64),
        Some(value) => decimal::parse_json(value).map_err(|msg| ApiError::validation("amount", msg))?,
    };

    let transaction = transaction_store::create(&state.db_pool, wallet_id, amount).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET /transactions/:txid
pub async fn get_transaction(
    Path(txid): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Transaction>> {
    let txid = parse_path_id(&txid, TRANSACTION_NOT_FOUND)?;
    transaction_store::get_by_txid(&state.db_pool, txid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(TRANSACTION_NOT_FOUND))
}
