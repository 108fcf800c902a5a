//! Normalized transaction records shared by the loader and the aggregators

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single cleaned statement line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    /// Date of the transaction (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Lower-cased description with everything outside `[a-z0-9 ]` removed
    pub description: String,
    /// Positive = income, negative = expense
    pub amount: f64,
    /// Optional category tag carried over from the source `type` column
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl TransactionRecord {
    /// Create a new record without a category tag
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Returns true if this is an expense (negative amount)
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// Returns true if this is income (positive amount)
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    /// Get the absolute amount
    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }
}
