//! Domain-level command types.
//! These are produced by the validation service and consumed by the sync
//! service. The REST layer maps the public request DTOs from the `shared`
//! crate onto them.

pub mod expenses {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde_json::json;

    use crate::domain::models::Category;
    use crate::storage::Fields;

    /// Validated input for creating an expense
    #[derive(Debug, Clone, PartialEq)]
    pub struct CreateExpenseCommand {
        pub title: String,
        pub amount: f64,
        pub category: Category,
    }

    impl CreateExpenseCommand {
        /// Document fields written to the store, stamped with `date`
        pub fn to_fields(&self, date: DateTime<Utc>) -> Fields {
            let mut fields = Fields::new();
            fields.insert("title".to_string(), json!(self.title));
            fields.insert("amount".to_string(), json!(self.amount));
            fields.insert("category".to_string(), json!(self.category.as_str()));
            fields.insert(
                "date".to_string(),
                json!(date.to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
            fields
        }
    }
}

pub mod savings {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde_json::json;

    use crate::domain::models::SavingType;
    use crate::storage::Fields;

    /// Validated input for creating a goal or a contribution
    #[derive(Debug, Clone, PartialEq)]
    pub struct CreateSavingCommand {
        pub title: String,
        pub amount: f64,
        pub saving_type: SavingType,
    }

    impl CreateSavingCommand {
        pub fn to_fields(&self, date: DateTime<Utc>) -> Fields {
            let mut fields = Fields::new();
            fields.insert("title".to_string(), json!(self.title));
            fields.insert("amount".to_string(), json!(self.amount));
            fields.insert("type".to_string(), json!(self.saving_type.as_str()));
            fields.insert(
                "date".to_string(),
                json!(date.to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
            fields
        }

        /// Message shown to the user once the record is stored
        pub fn success_message(&self) -> &'static str {
            match self.saving_type {
                SavingType::Goal => "New goal set!",
                SavingType::Contribution => "Savings updated!",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::expenses::CreateExpenseCommand;
    use super::savings::CreateSavingCommand;
    use crate::domain::models::{Category, Expense, Saving, SavingType};
    use crate::storage::Document;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_expense_fields_convert_back() {
        let command = CreateExpenseCommand {
            title: "Train".to_string(),
            amount: 7.4,
            category: Category::Transport,
        };
        let date = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();

        let fields = command.to_fields(date);
        assert_eq!(fields["date"], "2025-06-01T08:00:00.000Z");

        let expense = Expense::try_from(&Document::new("id-1", fields)).unwrap();
        assert_eq!(expense.category, Category::Transport);
        assert_eq!(expense.date, date);
    }

    #[test]
    fn test_saving_fields_and_message() {
        let command = CreateSavingCommand {
            title: "Vacation".to_string(),
            amount: 300.0,
            saving_type: SavingType::Goal,
        };

        let fields = command.to_fields(Utc::now());
        assert_eq!(fields["type"], "GOAL");
        assert_eq!(command.success_message(), "New goal set!");

        let saving = Saving::try_from(&Document::new("id-2", fields)).unwrap();
        assert!(saving.is_goal());
    }
}
