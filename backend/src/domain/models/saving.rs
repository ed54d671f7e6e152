//! Domain model for a saving record (goal or contribution).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{required_amount, required_date, required_title, RecordError};
use crate::storage::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavingType {
    Goal,
    Contribution,
}

impl SavingType {
    /// Value stored in the `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            SavingType::Goal => "GOAL",
            SavingType::Contribution => "CONTRIBUTION",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_uppercase().as_str() {
            "GOAL" => Ok(SavingType::Goal),
            "CONTRIBUTION" => Ok(SavingType::Contribution),
            _ => Err(format!("Invalid saving type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Saving {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub saving_type: SavingType,
    pub date: DateTime<Utc>,
}

impl Saving {
    pub fn is_goal(&self) -> bool {
        self.saving_type == SavingType::Goal
    }
}

impl TryFrom<&Document> for Saving {
    type Error = RecordError;

    fn try_from(document: &Document) -> Result<Self, Self::Error> {
        let fields = &document.fields;
        let raw_type = fields
            .get("type")
            .and_then(Value::as_str)
            .ok_or(RecordError::MissingField("type"))?;
        let saving_type = SavingType::parse(raw_type).map_err(|reason| RecordError::InvalidField {
            field: "type",
            reason,
        })?;

        Ok(Saving {
            id: document.id.clone(),
            title: required_title(fields)?,
            amount: required_amount(fields)?,
            saving_type,
            date: required_date(fields)?,
        })
    }
}
