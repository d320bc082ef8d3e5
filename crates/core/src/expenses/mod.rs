//! Operating expenses.

use std::collections::BTreeMap;

use comptoir_shared::types::{MONEY_SCALE, OutOfRange, ensure_fits, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Expense validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseError {
    /// Amount is zero or negative.
    #[error("Expense amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// Description is blank.
    #[error("Expense description cannot be empty")]
    EmptyDescription,

    /// Amount does not fit a money column.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
}

/// Expense category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Premises rent.
    Rent,
    /// Water, power, telecom.
    Utilities,
    /// Salaries paid outside payroll.
    Salaries,
    /// Fuel, vehicles, delivery.
    Transport,
    /// Office and shop supplies.
    Supplies,
    /// Repairs and upkeep.
    Maintenance,
    /// Advertising.
    Marketing,
    /// Taxes and duties.
    Taxes,
    /// Anything else.
    Other,
}

impl ExpenseCategory {
    /// All categories, in display order.
    pub const ALL: [Self; 9] = [
        Self::Rent,
        Self::Utilities,
        Self::Salaries,
        Self::Transport,
        Self::Supplies,
        Self::Maintenance,
        Self::Marketing,
        Self::Taxes,
        Self::Other,
    ];

    /// Returns the string representation of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::Utilities => "utilities",
            Self::Salaries => "salaries",
            Self::Transport => "transport",
            Self::Supplies => "supplies",
            Self::Maintenance => "maintenance",
            Self::Marketing => "marketing",
            Self::Taxes => "taxes",
            Self::Other => "other",
        }
    }

    /// Parses a category from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// How an expense was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash.
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// Card.
    Card,
    /// Cheque.
    Check,
}

impl PaymentMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
            Self::Card => "card",
            Self::Check => "check",
        }
    }

    /// Parses a method from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "bank_transfer" => Some(Self::BankTransfer),
            "card" => Some(Self::Card),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

/// Validates an expense before it is stored.
///
/// # Errors
///
/// Returns `NonPositiveAmount` when `amount <= 0`, `OutOfRange` when it has
/// more than two decimals or does not fit `NUMERIC(18, 2)`, and
/// `EmptyDescription` for a blank description.
pub fn validate_expense(amount: Decimal, description: &str) -> Result<(), ExpenseError> {
    if amount <= Decimal::ZERO {
        return Err(ExpenseError::NonPositiveAmount(amount));
    }
    ensure_fits(amount, MONEY_SCALE, "amount")?;
    if description.trim().is_empty() {
        return Err(ExpenseError::EmptyDescription);
    }
    Ok(())
}

/// Expense totals for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ExpenseSummary {
    /// Total per category, categories without expenses omitted.
    pub by_category: BTreeMap<ExpenseCategory, Decimal>,
    /// Grand total.
    pub total: Decimal,
    /// Number of expenses.
    pub count: u64,
}

/// Totals expenses per category.
#[must_use]
pub fn summarize(expenses: impl IntoIterator<Item = (ExpenseCategory, Decimal)>) -> ExpenseSummary {
    let mut summary = ExpenseSummary::default();
    for (category, amount) in expenses {
        let subtotal = summary.by_category.entry(category).or_default();
        *subtotal = subtotal.saturating_add(amount);
        summary.total = summary.total.saturating_add(amount);
        summary.count += 1;
    }
    for value in summary.by_category.values_mut() {
        *value = round_money(*value);
    }
    summary.total = round_money(summary.total);
    summary
}
