//! Domain model for an expense.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{required_amount, required_date, required_title, Category, RecordError};
use crate::storage::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub category: Category,
    pub date: DateTime<Utc>,
}

impl Expense {
    /// Whether this expense counts toward discretionary spending
    pub fn is_real_spending(&self) -> bool {
        !self.category.is_savings()
    }
}

impl TryFrom<&Document> for Expense {
    type Error = RecordError;

    fn try_from(document: &Document) -> Result<Self, Self::Error> {
        let fields = &document.fields;
        let category = fields
            .get("category")
            .and_then(Value::as_str)
            .map(Category::parse)
            .unwrap_or_default();

        Ok(Expense {
            id: document.id.clone(),
            title: required_title(fields)?,
            amount: required_amount(fields)?,
            category,
            date: required_date(fields)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Fields;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        let fields: Fields = serde_json::from_value(value).unwrap();
        Document::new("exp-1", fields)
    }

    #[test]
    fn test_from_document() {
        let doc = document(json!({
            "title": "Lunch",
            "amount": 12.5,
            "category": "Food",
            "date": "2025-06-12T12:00:00Z"
        }));

        let expense = Expense::try_from(&doc).unwrap();
        assert_eq!(expense.id, "exp-1");
        assert_eq!(expense.title, "Lunch");
        assert_eq!(expense.amount, 12.5);
        assert_eq!(expense.category, Category::Food);
        assert!(expense.is_real_spending());
    }

    #[test]
    fn test_missing_category_defaults_to_other() {
        let doc = document(json!({
            "title": "Mystery",
            "amount": "4.25",
            "date": "2025-06-12T12:00:00Z"
        }));

        let expense = Expense::try_from(&doc).unwrap();
        assert_eq!(expense.category, Category::Other);
        assert_eq!(expense.amount, 4.25);
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let doc = document(json!({
            "title": "Refund",
            "amount": -3.0,
            "category": "Food",
            "date": "2025-06-12T12:00:00Z"
        }));

        assert!(matches!(
            Expense::try_from(&doc),
            Err(RecordError::InvalidField { field: "amount", .. })
        ));
    }

    #[test]
    fn test_rejects_missing_date() {
        let doc = document(json!({ "title": "Bus", "amount": 2.0 }));
        assert_eq!(Expense::try_from(&doc), Err(RecordError::MissingField("date")));
    }
}
