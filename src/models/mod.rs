//! Domain types: wallets, transactions, ID aliases and list query options.

pub mod ids;
pub mod query;
pub mod transaction;
pub mod wallet;

pub use ids::{TransactionId, Txid, WalletId};
pub use query::{Ordering, SortDirection, TransactionFilter, TransactionSortField, WalletFilter, WalletSortField};
pub use transaction::Transaction;
pub use wallet::Wallet;
