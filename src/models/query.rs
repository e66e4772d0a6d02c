//! Filtering and ordering options for list endpoints.

use bigdecimal::BigDecimal;

use crate::error::{ApiError, Result};
use crate::utils::decimal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A column a list endpoint may be ordered by.
pub trait SortField: Copy {
    fn from_name(name: &str) -> Option<Self>;
    fn column(self) -> &'static str;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalletSortField {
    Label,
    CreatedAt,
}

impl SortField for WalletSortField {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "label" => Some(WalletSortField::Label),
            "created_at" => Some(WalletSortField::CreatedAt),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            WalletSortField::Label => "label",
            WalletSortField::CreatedAt => "created_at",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionSortField {
    CreatedAt,
}

impl SortField for TransactionSortField {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "created_at" => Some(TransactionSortField::CreatedAt),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            TransactionSortField::CreatedAt => "created_at",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ordering<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: SortField> Ordering<F> {
    pub fn desc(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }

    /// Parse an `ordering` parameter such as `label` or `-created_at`.
    /// Absent or empty falls back to `default`.
    pub fn parse(raw: Option<&str>, default: Self) -> Result<Self> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(default),
            Some(raw) => raw,
        };
        let (name, direction) = match raw.strip_prefix('-') {
            Some(name) => (name, SortDirection::Desc),
            None => (raw, SortDirection::Asc),
        };
        let field = F::from_name(name).ok_or_else(|| {
            ApiError::validation("ordering", format!("Unsupported ordering \"{}\".", raw))
        })?;
        Ok(Self { field, direction })
    }

    /// ORDER BY body. `id` breaks ties so page boundaries never shift.
    pub fn to_sql(&self) -> String {
        let direction = self.direction.as_sql();
        format!("{} {}, id {}", self.field.column(), direction, direction)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalletFilter {
    /// Exact label match.
    pub label: Option<String>,
}

impl WalletFilter {
    pub fn from_query(label: Option<&str>) -> Self {
        Self {
            label: label.filter(|l| !l.is_empty()).map(str::to_string),
        }
    }
}

/// Inclusive amount range.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub min_amount: Option<BigDecimal>,
    pub max_amount: Option<BigDecimal>,
}

impl TransactionFilter {
    pub fn from_query(min_amount: Option<&str>, max_amount: Option<&str>) -> Result<Self> {
        Ok(Self {
            min_amount: parse_bound("min_amount", min_amount)?,
            max_amount: parse_bound("max_amount", max_amount)?,
        })
    }
}

fn parse_bound(field: &str, raw: Option<&str>) -> Result<Option<BigDecimal>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => decimal::parse_str(raw)
            .map(Some)
            .map_err(|_| ApiError::validation(field, "Enter a number.")),
    }
}
