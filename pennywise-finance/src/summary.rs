//! Aggregate summary over normalized records: count, income, spend.

use pennywise_core::TransactionRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text handed to the model when there is nothing to summarize
pub const NO_DATA: &str = "No financial data available.";

/// Either real totals, or an explicit "no data" marker so that an empty
/// statement is never mistaken for one whose totals are all zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Summary {
    NoData,
    Totals {
        count: usize,
        total_income: f64,
        /// Absolute value of the sum of negative amounts
        total_spend: f64,
    },
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        matches!(self, Summary::NoData)
    }

    /// Signed net of income and spend; `None` when there is no data
    pub fn net(&self) -> Option<f64> {
        match self {
            Summary::NoData => None,
            Summary::Totals {
                total_income,
                total_spend,
                ..
            } => Some(total_income - total_spend),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::NoData => f.write_str(NO_DATA),
            Summary::Totals {
                count,
                total_income,
                total_spend,
            } => write!(
                f,
                "Total transactions: {count}. Total income: {total_income:.2}. Total spending: {total_spend:.2}."
            ),
        }
    }
}

pub fn summarize(records: &[TransactionRecord]) -> Summary {
    if records.is_empty() {
        return Summary::NoData;
    }

    let total_income: f64 = records.iter().filter(|r| r.is_income()).map(|r| r.amount).sum();
    let total_spend: f64 = records
        .iter()
        .filter(|r| r.is_expense())
        .map(TransactionRecord::abs_amount)
        .sum();

    Summary::Totals {
        count: records.len(),
        total_income,
        total_spend,
    }
}
