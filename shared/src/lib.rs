use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of saving record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SavingType {
    /// Target the user is saving toward
    Goal,
    /// Money put aside toward the goal
    Contribution,
}

impl fmt::Display for SavingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SavingType::Goal => write!(f, "GOAL"),
            SavingType::Contribution => write!(f, "CONTRIBUTION"),
        }
    }
}

/// A saving record as exchanged with presentation clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Saving {
    pub id: String,
    pub title: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub saving_type: SavingType,
    /// Creation timestamp (RFC 3339)
    pub date: String,
}

/// A single expense row prepared for list display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedExpense {
    pub id: String,
    pub title: String,
    /// Short month and day, e.g. "Dec 28"
    pub formatted_date: String,
    /// Outflow amount, e.g. "-$12.50"
    pub formatted_amount: String,
    pub category: String,
    pub icon: String,
    pub color: String,
    pub raw_amount: f64,
    pub raw_date: String,
}

/// Request body for creating an expense. The amount is the raw text the user typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    pub title: String,
    pub amount: String,
    /// Category label; unknown or missing values fall back to "Other"
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExpenseResponse {
    pub id: String,
}

/// Request body for creating a saving record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSavingRequest {
    pub title: String,
    pub amount: String,
    /// true creates a new goal, false adds a contribution
    pub is_goal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSavingResponse {
    pub id: String,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetSavingsResponse {
    pub deleted_count: usize,
}

/// One bar of the spending distribution chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub category: String,
    /// Four-character label followed by a period, e.g. "Tran."
    pub label: String,
    pub amount: f64,
    /// Hex colour, e.g. "#3b82f6"
    pub color: String,
}

/// Progress toward the active savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsStats {
    /// Title of the active goal, or "No Goal Set"
    pub active_goal: String,
    pub total_saved: f64,
    pub remaining: f64,
    /// Percentage in [0, 100]
    pub progress: f64,
    pub has_goal: bool,
    pub progress_label: String,
}

/// Everything the main screen derives from the two collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub real_spending_total: f64,
    pub formatted_real_spending: String,
    /// None when there is no spending at all and the chart should not render
    pub chart: Option<Vec<ChartBar>>,
    pub savings: SavingsStats,
}

/// Generic error body returned by the HTTP layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error body returned when a savings reset only partly succeeded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialResetResponse {
    pub error: String,
    pub deleted: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saving_type_wire_format() {
        let json = serde_json::to_string(&SavingType::Contribution).unwrap();
        assert_eq!(json, "\"CONTRIBUTION\"");

        let parsed: SavingType = serde_json::from_str("\"GOAL\"").unwrap();
        assert_eq!(parsed, SavingType::Goal);
    }

    #[test]
    fn test_saving_uses_type_field() {
        let saving = Saving {
            id: "abc".to_string(),
            title: "Phone".to_string(),
            amount: 100.0,
            saving_type: SavingType::Goal,
            date: "2025-01-01T00:00:00Z".to_string(),
        };

        let value = serde_json::to_value(&saving).unwrap();
        assert_eq!(value["type"], "GOAL");
        assert!(value.get("saving_type").is_none());
    }

    #[test]
    fn test_create_expense_request_category_optional() {
        let request: CreateExpenseRequest =
            serde_json::from_str(r#"{"title":"Coffee","amount":"3.50"}"#).unwrap();
        assert_eq!(request.category, None);
    }
}
