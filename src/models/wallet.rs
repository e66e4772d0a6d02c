use chrono::{DateTime, Utc};
use bigdecimal::BigDecimal;
use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, Row};

use super::ids::WalletId;
use crate::error::ApiError;

pub const LABEL_MAX_CHARS: usize = 250;

#[derive(Clone, Debug, Serialize)]
pub struct Wallet {
    pub id: WalletId,
    pub label: String,
    #[serde(serialize_with = "crate::utils::decimal::serialize")]
    pub balance: BigDecimal,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Wallet {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            label: row.try_get("label")?,
            balance: row.try_get("balance")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Check a label from a request body and return it ready to store.
pub fn validate_label(label: Option<&str>) -> Result<String, ApiError> {
    let label = label.ok_or_else(|| ApiError::validation("label", "This field is required."))?;
    let label = label.trim();
    if label.is_empty() {
        return Err(ApiError::validation("label", "This field may not be blank."));
    }
    if label.chars().count() > LABEL_MAX_CHARS {
        return Err(ApiError::validation(
            "label",
            format!(
                "Ensure this field has no more than {} characters.",
                LABEL_MAX_CHARS
            ),
        ));
    }
    Ok(label.to_string())
}
