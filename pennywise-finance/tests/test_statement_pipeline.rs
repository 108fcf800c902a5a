use anyhow::Result;
use chrono::Month;
use pennywise_finance::{extract_monthly_totals, summarize, Summary};
use pennywise_ingest::{excerpt_pages, load_tabular, normalize, write_records_csv};
use std::io::Write;
use std::path::Path;

fn write_file(dir: &Path, name: &str, contents: &str) -> Result<std::path::PathBuf> {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path)?;
    f.write_all(contents.as_bytes())?;
    Ok(path)
}

/// Messy bank export: odd headers, extra columns, bad rows and a duplicate.
const RAW_EXPORT: &str = "\
 Date ,Description,Amount,Balance,Type
2024-01-05,STARBUCKS #123,-50.00,950.00,debit
2024-01-06,ACME Payroll,200.00,1150.00,credit
2024-01-06,ACME Payroll,200.00,1150.00,credit
not-a-date,Mystery,-1.00,1149.00,debit
2024-01-07,Pending,,1149.00,debit
2024-01-08,Rent - Jan,-700.00,449.00,debit
";

#[test]
fn test_csv_to_summary() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_file(dir.path(), "statement.csv", RAW_EXPORT)?;

    let records = normalize(&load_tabular(&path));
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].description, "starbucks 123");
    assert_eq!(records[2].description, "rent  jan");

    let summary = summarize(&records);
    assert_eq!(
        summary,
        Summary::Totals {
            count: 3,
            total_income: 200.0,
            total_spend: 750.0
        }
    );
    assert_eq!(
        summary.to_string(),
        "Total transactions: 3. Total income: 200.00. Total spending: 750.00."
    );
    Ok(())
}

#[test]
fn test_cleaned_export_summarizes_identically() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let raw = write_file(dir.path(), "raw.csv", RAW_EXPORT)?;
    let cleaned = dir.path().join("cleaned.csv");

    let records = normalize(&load_tabular(&raw));
    write_records_csv(&cleaned, &records)?;

    let reloaded = normalize(&load_tabular(&cleaned));
    assert_eq!(reloaded, records);
    assert_eq!(summarize(&reloaded), summarize(&records));
    Ok(())
}

#[test]
fn test_missing_or_amountless_file_is_no_data() -> Result<()> {
    let dir = tempfile::tempdir()?;
    assert_eq!(summarize(&normalize(&load_tabular(dir.path().join("nope.csv")))), Summary::NoData);

    let path = write_file(dir.path(), "no_amount.csv", "date,description\n2024-01-05,Coffee\n")?;
    assert_eq!(summarize(&normalize(&load_tabular(&path))), Summary::NoData);
    Ok(())
}

#[test]
fn test_pdf_pages_to_monthly_totals() {
    let pages = [
        "ACME BANK\nStatement for Jan 2024\nJan 03 Grocery 1,200.50\n",
        "",
        "Jan 20 Refund 50.00\nFeb 02 Rent 900.00\n",
    ];
    let text = excerpt_pages(pages, 4000);
    let totals = extract_monthly_totals(&text);

    // "Statement for Jan 2024\nJan 03 ..." pairs the header month with 1,200.50
    assert_eq!(totals.get(Month::January), Some(1250.50));
    assert_eq!(totals.get(Month::February), Some(900.0));
    assert_eq!(totals.to_string(), "Jan: 1250.50, Feb: 900.00");
}
