pub mod transactions;
pub mod wallets;

pub use transactions::{
    create_transaction,
    get_transaction,
    list_transactions,
    CreateTransactionRequest,
    TransactionListQuery,
};
pub use wallets::{
    create_wallet,
    delete_wallet,
    get_wallet,
    list_wallet_transactions,
    list_wallets,
    patch_wallet,
    replace_wallet,
    CreateWalletRequest,
    UpdateWalletRequest,
    WalletListQuery,
};

pub async fn health_check() -> &'static str {
    "OK"
}
