//! Turn a [`RawTable`] into clean, de-duplicated [`TransactionRecord`]s.
//!
//! Rules:
//! - headers are trimmed, lower-cased and snake-cased, then restricted to
//!   `date`, `description`, `amount`, `type`
//! - rows whose date or amount does not parse are dropped
//! - descriptions keep only `[a-z0-9 ]` after lower-casing
//! - exact duplicates (after cleaning) are dropped, first occurrence wins

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use pennywise_core::TransactionRecord;
use std::collections::HashSet;
use tracing::debug;

use crate::types::RawTable;

/// Columns the normalizer understands; everything else is ignored
pub const KNOWN_COLUMNS: [&str; 4] = ["date", "description", "amount", "type"];

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

/// `" Transaction Date "` -> `"transaction_date"`
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Parse a signed amount such as `-50.00`, `1,200.50` or `$12.00`.
///
/// Non-finite values (`nan`, `inf`) are rejected.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('$').unwrap_or(rest);

    let digits: String = rest.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    let value: f64 = digits.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Lower-case, then drop everything that is not an ASCII letter, digit or space.
pub fn normalize_description(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect()
}

struct Columns {
    date: Option<usize>,
    description: Option<usize>,
    amount: Option<usize>,
    kind: Option<usize>,
}

impl Columns {
    fn locate(headers: &[String]) -> Self {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let find = |name: &str| normalized.iter().position(|h| h == name);
        Self {
            date: find(KNOWN_COLUMNS[0]),
            description: find(KNOWN_COLUMNS[1]),
            amount: find(KNOWN_COLUMNS[2]),
            kind: find(KNOWN_COLUMNS[3]),
        }
    }
}

fn cell(row: &[String], idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| row.get(i)).map(String::as_str)
}

#[derive(PartialEq, Eq, Hash)]
struct DedupKey {
    date: NaiveDate,
    description: String,
    amount_bits: u64,
    kind: Option<String>,
}

impl DedupKey {
    fn of(r: &TransactionRecord) -> Self {
        // -0.0 and 0.0 compare equal, so they must share a key
        let amount = if r.amount == 0.0 { 0.0 } else { r.amount };
        Self {
            date: r.date,
            description: r.description.clone(),
            amount_bits: amount.to_bits(),
            kind: r.kind.clone(),
        }
    }
}

/// Clean a raw table. Deterministic: same rows in, same records out, same order.
pub fn normalize(table: &RawTable) -> Vec<TransactionRecord> {
    let cols = Columns::locate(&table.headers);
    let (Some(date_col), Some(amount_col)) = (cols.date, cols.amount) else {
        debug!(headers = ?table.headers, "statement has no date/amount column");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut dropped_invalid = 0usize;

    for row in &table.rows {
        let date = row.get(date_col).and_then(|s| parse_date(s));
        let amount = row.get(amount_col).and_then(|s| parse_amount(s));
        let (Some(date), Some(amount)) = (date, amount) else {
            dropped_invalid += 1;
            continue;
        };

        let description = cell(row, cols.description)
            .map(normalize_description)
            .unwrap_or_default();
        let mut record = TransactionRecord::new(date, description, amount);
        if let Some(kind) = cell(row, cols.kind).map(str::trim).filter(|k| !k.is_empty()) {
            record = record.with_kind(kind);
        }

        if seen.insert(DedupKey::of(&record)) {
            out.push(record);
        }
    }

    debug!(
        input = table.len(),
        kept = out.len(),
        dropped_invalid,
        "normalized statement rows"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        let mut t = RawTable::new(headers.iter().map(|s| s.to_string()).collect());
        for r in rows {
            t.push_row(r.iter().map(|s| s.to_string()).collect());
        }
        t
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_header_normalization() {
        assert_eq!(normalize_header("  Date "), "date");
        assert_eq!(normalize_header("Transaction Date"), "transaction_date");
        assert_eq!(normalize_header("TYPE"), "type");
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-01-05"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024/01/05"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("01/05/2024"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("05-Jan-2024"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("Jan 05, 2024"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 13:45:00"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T13:45:00+02:00"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("-50.00"), Some(-50.0));
        assert_eq!(parse_amount(" 200 "), Some(200.0));
        assert_eq!(parse_amount("1,200.50"), Some(1200.5));
        assert_eq!(parse_amount("$12.00"), Some(12.0));
        assert_eq!(parse_amount("-$12.00"), Some(-12.0));
        assert_eq!(parse_amount("+3.5"), Some(3.5));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount("nan"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("--5"), None);
    }

    #[test]
    fn test_description_cleanup() {
        assert_eq!(normalize_description("STARBUCKS #123, Seattle!"), "starbucks 123 seattle");
        assert_eq!(normalize_description("Café Ñandú"), "caf and");
    }

    #[test]
    fn test_normalize_drops_invalid_rows_and_extra_columns() {
        let t = table(
            &["Date", "Description", "Amount", "Balance"],
            &[
                &["2024-01-05", "Coffee Shop!", "-4.50", "95.50"],
                &["not a date", "Lunch", "-10.00", "85.50"],
                &["2024-01-06", "Mystery", "abc", "85.50"],
                &["2024-01-07", "Payroll", "200.00", "285.50"],
            ],
        );
        let recs = normalize(&t);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].description, "coffee shop");
        assert_eq!(recs[0].amount, -4.5);
        assert_eq!(recs[0].kind, None);
        assert_eq!(recs[1].date, d(2024, 1, 7));
    }

    #[test]
    fn test_normalize_removes_duplicates_keeping_order() {
        let t = table(
            &["date", "description", "amount", "type"],
            &[
                &["2024-01-05", "Coffee", "-4.50", "debit"],
                &["2024-01-06", "Payroll", "200.00", "credit"],
                &["2024-01-05", "COFFEE!", "-4.50", "debit"],
                &["2024-01-05", "Coffee", "-4.50", "credit"],
            ],
        );
        let recs = normalize(&t);
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].description, "coffee");
        assert_eq!(recs[1].description, "payroll");
        assert_eq!(recs[2].kind.as_deref(), Some("credit"));

        for (i, a) in recs.iter().enumerate() {
            for b in &recs[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_missing_amount_column_yields_nothing() {
        let t = table(&["date", "description"], &[&["2024-01-05", "Coffee"]]);
        assert!(normalize(&t).is_empty());
    }

    #[test]
    fn test_missing_optional_columns_are_tolerated() {
        let t = table(&["amount", "date"], &[&["-4.50", "2024-01-05"]]);
        let recs = normalize(&t);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].description, "");
        assert_eq!(recs[0].kind, None);
    }

    #[test]
    fn test_blank_type_is_none() {
        let t = table(&["date", "amount", "type"], &[&["2024-01-05", "1.00", "  "]]);
        assert_eq!(normalize(&t)[0].kind, None);
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let t = table(
            &["date", "description", "amount"],
            &[
                &["2024-03-01", "B", "1"],
                &["2024-01-01", "A", "2"],
                &["2024-03-01", "B", "1"],
            ],
        );
        assert_eq!(normalize(&t), normalize(&t));
    }
}
