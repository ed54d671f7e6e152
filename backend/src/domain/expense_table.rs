//! Expense list formatting.
//!
//! Turns expense records into rows ready for display: short dates, signed
//! currency amounts and the icon and colour of each category.

use chrono::{DateTime, SecondsFormat, Utc};
use shared::FormattedExpense;

use crate::domain::models::Expense;

/// Formats expenses for the recent-expenses list
#[derive(Debug, Clone)]
pub struct ExpenseTableService {
    currency_symbol: String,
}

impl ExpenseTableService {
    pub fn new() -> Self {
        Self {
            currency_symbol: "$".to_string(),
        }
    }

    pub fn format_expenses(&self, expenses: &[Expense]) -> Vec<FormattedExpense> {
        expenses
            .iter()
            .map(|expense| self.format_expense(expense))
            .collect()
    }

    pub fn format_expense(&self, expense: &Expense) -> FormattedExpense {
        let style = expense.category.style();
        FormattedExpense {
            id: expense.id.clone(),
            title: expense.title.clone(),
            formatted_date: self.format_date(&expense.date),
            formatted_amount: self.format_amount(expense.amount),
            category: expense.category.as_str().to_string(),
            icon: style.icon.to_string(),
            color: style.color.to_string(),
            raw_amount: expense.amount,
            raw_date: expense.date.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Short month and day, e.g. "Dec 28"
    pub fn format_date(&self, date: &DateTime<Utc>) -> String {
        date.format("%b %-d").to_string()
    }

    /// Expenses are outflows, e.g. "-$12.50"
    pub fn format_amount(&self, amount: f64) -> String {
        format!("-{}", self.format_currency(amount))
    }

    pub fn format_currency(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount.abs())
    }
}

impl Default for ExpenseTableService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Category, SUCCESS_COLOR};
    use chrono::TimeZone;

    fn expense(amount: f64, category: Category) -> Expense {
        Expense {
            id: "exp-1".to_string(),
            title: "Dinner".to_string(),
            amount,
            category,
            date: Utc.with_ymd_and_hms(2024, 12, 28, 19, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_format_expense_row() {
        let service = ExpenseTableService::new();
        let row = service.format_expense(&expense(12.5, Category::Food));

        assert_eq!(row.formatted_date, "Dec 28");
        assert_eq!(row.formatted_amount, "-$12.50");
        assert_eq!(row.category, "Food");
        assert_eq!(row.icon, "cutlery");
        assert_eq!(row.color, "#f59e0b");
        assert_eq!(row.raw_amount, 12.5);
        assert_eq!(row.raw_date, "2024-12-28T19:30:00.000Z");
    }

    #[test]
    fn test_savings_rows_use_success_style() {
        let service = ExpenseTableService::new();
        let row = service.format_expense(&expense(100.0, Category::Savings));

        assert_eq!(row.icon, "bank");
        assert_eq!(row.color, SUCCESS_COLOR);
    }

    #[test]
    fn test_single_digit_day_and_currency() {
        let service = ExpenseTableService::new();
        let date = Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap();

        assert_eq!(service.format_date(&date), "Mar 4");
        assert_eq!(service.format_currency(1234.5), "$1234.50");
        assert_eq!(service.format_currency(0.0), "$0.00");
    }
}
