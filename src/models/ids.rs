//! Type aliases for entity IDs. All are UUIDs; validation happens at parse boundaries.

use uuid::Uuid;

use crate::error::ApiError;

pub type WalletId = Uuid;
pub type TransactionId = Uuid;
/// Public transaction identifier, distinct from the primary key.
pub type Txid = Uuid;

/// Parse a path segment into a UUID. A malformed id cannot name an existing
/// record, so it is reported as not found.
pub fn parse_path_id(id: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::not_found(not_found))
}

/// Parse a UUID supplied in a request body field.
pub fn parse_field_id(id: &str, field: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id.trim()).map_err(|_| ApiError::validation(field, "Must be a valid UUID."))
}
