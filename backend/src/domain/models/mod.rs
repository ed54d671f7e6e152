//! Typed records built from raw store documents.

pub mod category;
pub mod expense;
pub mod saving;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::storage::{Fields, DATE_FIELD};

pub use category::{Category, CategoryStyle, FALLBACK_COLOR, SUCCESS_COLOR};
pub use expense::Expense;
pub use saving::{Saving, SavingType};

/// Why a stored document could not be turned into a record
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

fn required_title(fields: &Fields) -> Result<String, RecordError> {
    let title = fields
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .ok_or(RecordError::MissingField("title"))?;
    if title.is_empty() {
        return Err(RecordError::InvalidField {
            field: "title",
            reason: "empty".to_string(),
        });
    }
    Ok(title.to_string())
}

/// Amounts are numbers, but older clients wrote them as numeric strings
fn required_amount(fields: &Fields) -> Result<f64, RecordError> {
    let value = fields.get("amount").ok_or(RecordError::MissingField("amount"))?;
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| RecordError::InvalidField {
        field: "amount",
        reason: format!("not a number: {}", value),
    })?;

    if !amount.is_finite() || amount <= 0.0 {
        return Err(RecordError::InvalidField {
            field: "amount",
            reason: format!("must be positive, got {}", amount),
        });
    }
    Ok(amount)
}

fn required_date(fields: &Fields) -> Result<DateTime<Utc>, RecordError> {
    let raw = fields
        .get(DATE_FIELD)
        .and_then(Value::as_str)
        .ok_or(RecordError::MissingField("date"))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| RecordError::InvalidField {
            field: "date",
            reason: e.to_string(),
        })
}
