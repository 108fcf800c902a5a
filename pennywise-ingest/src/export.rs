//! Save cleaned records back to CSV (`date,description,amount,type`).

use anyhow::{Context, Result};
use pennywise_core::TransactionRecord;
use std::path::Path;

use crate::normalize::KNOWN_COLUMNS;

/// Write `records` to `path`. The header row is always present, so a
/// statement with no valid rows still yields a readable file.
pub fn write_records_csv(path: impl AsRef<Path>, records: &[TransactionRecord]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    wtr.write_record(KNOWN_COLUMNS)
        .with_context(|| format!("writing {}", path.display()))?;
    for r in records {
        wtr.serialize(r)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    wtr.flush().with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{load_tabular, normalize};
    use chrono::NaiveDate;

    #[test]
    fn test_written_file_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("cleaned.csv");
        let records = vec![
            TransactionRecord::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), "coffee", -4.5)
                .with_kind("debit"),
            TransactionRecord::new(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(), "payroll", 200.0),
        ];

        write_records_csv(&path, &records).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("date,description,amount,type\n"));
        assert!(text.contains("2024-01-05,coffee,-4.5,debit"));

        assert_eq!(normalize(&load_tabular(&path)), records);
    }

    #[test]
    fn test_empty_export_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");

        write_records_csv(&path, &[]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "date,description,amount,type\n");
        assert!(normalize(&load_tabular(&path)).is_empty());
    }
}
