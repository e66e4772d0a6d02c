use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::AppState;

/// Method + path table for the whole API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/wallets",
            get(handlers::list_wallets).post(handlers::create_wallet),
        )
        .route(
            "/wallets/:id",
            get(handlers::get_wallet)
                .put(handlers::replace_wallet)
                .patch(handlers::patch_wallet)
                .delete(handlers::delete_wallet),
        )
        .route(
            "/wallets/:id/transactions",
            get(handlers::list_wallet_transactions),
        )
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/transactions/:txid", get(handlers::get_transaction))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
