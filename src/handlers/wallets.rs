use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use crate::database::{transactions as transaction_store, wallets as wallet_store};
use crate::error::{ApiError, Result};
use crate::models::ids::parse_path_id;
use crate::models::{Ordering, Transaction, Wallet, WalletFilter, WalletSortField};
use crate::utils::pagination::{Page, PageRequest};
use crate::AppState;

const WALLET_NOT_FOUND: &str = "Wallet not found";

#[derive(Debug, Default, Deserialize)]
pub struct WalletListQuery {
    pub label: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateWalletRequest {
    pub label: Option<String>,
}

/// Body for PUT and PATCH. Anything but `label` (e.g. `balance`) is ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateWalletRequest {
    pub label: Option<String>,
}

/// GET /wallets
pub async fn list_wallets(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    query: std::result::Result<Query<WalletListQuery>, QueryRejection>,
) -> Result<Json<Page<Wallet>>> {
    let Query(params) = query?;
    let filter = WalletFilter::from_query(params.label.as_deref());
    let ordering = Ordering::parse(
        params.ordering.as_deref(),
        Ordering::desc(WalletSortField::CreatedAt),
    )?;
    let page = PageRequest::from_query(params.page.as_deref(), state.config.page_size)?;

    let (wallets, count) = wallet_store::list(&state.db_pool, &filter, ordering, page).await?;
    Ok(Json(Page::new(wallets, count, page, &uri)))
}

/// POST /wallets
pub async fn create_wallet(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateWalletRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Wallet>)> {
    let Json(payload) = payload?;
    let wallet = wallet_store::create(&state.db_pool, payload.label.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(wallet)))
}

/// GET /wallets/:id
pub async fn get_wallet(
    Path(wallet_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Wallet>> {
    let wallet_id = parse_path_id(&wallet_id, WALLET_NOT_FOUND)?;
    wallet_store::get(&state.db_pool, wallet_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(WALLET_NOT_FOUND))
}

/// PUT /wallets/:id
pub async fn replace_wallet(
    Path(wallet_id): Path<String>,
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdateWalletRequest>, JsonRejection>,
) -> Result<Json<Wallet>> {
    let Json(payload) = payload?;
    update_wallet(&state, &wallet_id, payload.label.as_deref(), false).await
}

/// PATCH /wallets/:id
pub async fn patch_wallet(
    Path(wallet_id): Path<String>,
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdateWalletRequest>, JsonRejection>,
) -> Result<Json<Wallet>> {
    let Json(payload) = payload?;
    update_wallet(&state, &wallet_id, payload.label.as_deref(), true).await
}

async fn update_wallet(
    state: &AppState,
    wallet_id: &str,
    label: Option<&str>,
    partial: bool,
) -> Result<Json<Wallet>> {
    let wallet_id = parse_path_id(wallet_id, WALLET_NOT_FOUND)?;

    // A PATCH without a label changes nothing.
    let wallet = if partial && label.is_none() {
        wallet_store::get(&state.db_pool, wallet_id).await?
    } else {
        wallet_store::update_label(&state.db_pool, wallet_id, label).await?
    };

    wallet
        .map(Json)
        .ok_or_else(|| ApiError::not_found(WALLET_NOT_FOUND))
}

/// DELETE /wallets/:id
pub async fn delete_wallet(
    Path(wallet_id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    let wallet_id = parse_path_id(&wallet_id, WALLET_NOT_FOUND)?;
    if wallet_store::delete(&state.db_pool, wallet_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(WALLET_NOT_FOUND))
    }
}

/// GET /wallets/:id/transactions
pub async fn list_wallet_transactions(
    Path(wallet_id): Path<String>,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    query: std::result::Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Page<Transaction>>> {
    let wallet_id = parse_path_id(&wallet_id, WALLET_NOT_FOUND)?;
    let Query(params) = query?;
    let page = PageRequest::from_query(params.page.as_deref(), state.config.page_size)?;

    if !wallet_store::exists(&state.db_pool, wallet_id).await? {
        return Err(ApiError::not_found(WALLET_NOT_FOUND));
    }

    let (transactions, count) =
        transaction_store::list_for_wallet(&state.db_pool, wallet_id, page).await?;
    Ok(Json(Page::new(transactions, count, page, &uri)))
}
