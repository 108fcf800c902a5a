//! Month-by-month totals pulled out of unstructured statement text.
//!
//! Matching is a heuristic: a month token (`Jan`..`Dec`, any case, also the
//! first three letters of a longer word) is paired with the next amount that
//! has exactly two decimals, however much text lies in between, newlines
//! included. Unrelated text between the two can therefore be swallowed
//! (e.g. "summary" contains "mar"). This over-matching is accepted; callers
//! that need exact figures should go through the CSV path instead.
//!
//! Example:
//!   "Jan spend 1,200.50 and Jan refund 50.00" -> {Jan: 1250.50}

use chrono::Month;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static MONTH_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?is)(?P<month>jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)",
        r".*?",
        r"(?P<amt>\d+(?:,\d{3})*\.\d{2})\b"
    ))
    .expect("month/amount pattern is valid")
});

fn month_from_abbrev(s: &str) -> Option<Month> {
    let month = match s.to_ascii_lowercase().as_str() {
        "jan" => Month::January,
        "feb" => Month::February,
        "mar" => Month::March,
        "apr" => Month::April,
        "may" => Month::May,
        "jun" => Month::June,
        "jul" => Month::July,
        "aug" => Month::August,
        "sep" => Month::September,
        "oct" => Month::October,
        "nov" => Month::November,
        "dec" => Month::December,
        _ => return None,
    };
    Some(month)
}

/// Canonical three-letter label, e.g. `Jan`
pub fn month_abbrev(month: Month) -> &'static str {
    &month.name()[..3]
}

/// Per-month totals in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    entries: Vec<(Month, f64)>,
}

impl MonthlyTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the bucket for `month`, creating it on first sight.
    pub fn add(&mut self, month: Month, amount: f64) {
        match self.entries.iter_mut().find(|(m, _)| *m == month) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((month, amount)),
        }
    }

    pub fn get(&self, month: Month) -> Option<f64> {
        self.entries
            .iter()
            .find(|(m, _)| *m == month)
            .map(|(_, total)| *total)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for MonthlyTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("No monthly totals found.");
        }
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(m, total)| format!("{}: {:.2}", month_abbrev(*m), total))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// Scan `text` for month/amount pairs and sum the amounts per month.
pub fn extract_monthly_totals(text: &str) -> MonthlyTotals {
    let mut totals = MonthlyTotals::new();
    let mut matches = 0usize;

    for caps in MONTH_AMOUNT.captures_iter(text) {
        let Some(month) = month_from_abbrev(&caps["month"]) else {
            continue;
        };
        let Ok(amount) = caps["amt"].replace(',', "").parse::<f64>() else {
            continue;
        };
        totals.add(month, amount);
        matches += 1;
    }

    debug!(matches, months = totals.len(), "extracted monthly totals");
    totals
}
