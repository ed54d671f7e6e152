//! Form validation for expense and saving input.
//!
//! Both forms follow the same policy: a blank title or blank amount is a
//! missing-field error, and an amount that does not parse to a positive finite
//! number is an invalid-amount error. Nothing is written to the store until
//! validation passes.

use std::fmt;

use crate::domain::commands::expenses::CreateExpenseCommand;
use crate::domain::commands::savings::CreateSavingCommand;
use crate::domain::models::{Category, SavingType};

/// Form field a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Amount,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::Title => f.write_str("title"),
            FormField::Amount => f.write_str("amount"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all fields ({0} is missing)")]
    MissingField(FormField),
    #[error("Please enter a valid amount ({0})")]
    InvalidAmount(String),
}

impl ValidationError {
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::MissingField(field) => *field,
            ValidationError::InvalidAmount(_) => FormField::Amount,
        }
    }
}

/// Validates raw form input into commands
#[derive(Debug, Clone)]
pub struct ValidationService {
    currency_symbol: String,
}

impl ValidationService {
    pub fn new() -> Self {
        Self::with_currency_symbol("$")
    }

    pub fn with_currency_symbol(symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: symbol.into(),
        }
    }

    /// Validate the expense form. A missing or unknown category becomes `Other`.
    pub fn validate_expense(
        &self,
        title: &str,
        amount_input: &str,
        category: Option<&str>,
    ) -> Result<CreateExpenseCommand, ValidationError> {
        let (title, amount) = self.validate_title_and_amount(title, amount_input)?;
        Ok(CreateExpenseCommand {
            title,
            amount,
            category: category.map(Category::parse).unwrap_or_default(),
        })
    }

    /// Validate the savings form; `is_goal` selects between a new goal and a contribution
    pub fn validate_saving(
        &self,
        title: &str,
        amount_input: &str,
        is_goal: bool,
    ) -> Result<CreateSavingCommand, ValidationError> {
        let (title, amount) = self.validate_title_and_amount(title, amount_input)?;
        let saving_type = if is_goal {
            SavingType::Goal
        } else {
            SavingType::Contribution
        };
        Ok(CreateSavingCommand {
            title,
            amount,
            saving_type,
        })
    }

    /// Re-check a command built outside the form path
    pub fn check_expense(&self, command: &CreateExpenseCommand) -> Result<(), ValidationError> {
        Self::check_title(&command.title)?;
        Self::check_amount(command.amount)
    }

    pub fn check_saving(&self, command: &CreateSavingCommand) -> Result<(), ValidationError> {
        Self::check_title(&command.title)?;
        Self::check_amount(command.amount)
    }

    /// Strip the currency symbol, thousands separators and spaces, then parse
    pub fn clean_and_parse_amount(&self, amount_input: &str) -> Result<f64, ValidationError> {
        let cleaned: String = amount_input
            .trim()
            .replace(&self.currency_symbol, "")
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();

        if cleaned.is_empty() {
            return Err(ValidationError::InvalidAmount("no digits".to_string()));
        }

        cleaned
            .parse::<f64>()
            .map_err(|e| {
                ValidationError::InvalidAmount(format!("'{}': {}", amount_input.trim(), e))
            })
    }

    fn validate_title_and_amount(
        &self,
        title: &str,
        amount_input: &str,
    ) -> Result<(String, f64), ValidationError> {
        let title = title.trim();
        Self::check_title(title)?;
        if amount_input.trim().is_empty() {
            return Err(ValidationError::MissingField(FormField::Amount));
        }

        let amount = self.clean_and_parse_amount(amount_input)?;
        Self::check_amount(amount)?;
        Ok((title.to_string(), amount))
    }

    fn check_title(title: &str) -> Result<(), ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::MissingField(FormField::Title));
        }
        Ok(())
    }

    fn check_amount(amount: f64) -> Result<(), ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::InvalidAmount("not a finite number".to_string()));
        }
        if amount <= 0.0 {
            return Err(ValidationError::InvalidAmount("must be greater than 0".to_string()));
        }
        Ok(())
    }
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new()
    }
}
