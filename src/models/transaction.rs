use chrono::{DateTime, Utc};
use bigdecimal::BigDecimal;
use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, Row};

use super::ids::{TransactionId, Txid, WalletId};

/// An immutable signed amount entry. Clients address it by `txid`, never by `id`.
#[derive(Clone, Debug, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub txid: Txid,
    #[serde(serialize_with = "crate::utils::decimal::serialize")]
    pub amount: BigDecimal,
    /// Owning wallet's id.
    pub wallet: WalletId,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Transaction {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            txid: row.try_get("txid")?,
            amount: row.try_get("amount")?,
            wallet: row.try_get("wallet_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn wallet_serializes_as_plain_id() {
        let wallet_id = Uuid::new_v4();
        let transaction = Transaction {
            id: Uuid::new_v4(),
            txid: Uuid::new_v4(),
            amount: "-7.500000000000000000".parse::<BigDecimal>().unwrap(),
            wallet: wallet_id,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&transaction).unwrap();
        assert_eq!(value["wallet"], wallet_id.to_string());
        assert_eq!(value["amount"], "-7.5");
        assert!(value.get("created_at").is_none());
    }
}
