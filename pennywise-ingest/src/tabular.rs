//! Load delimited statement exports into a [`RawTable`].
//!
//! Loading never fails hard: a missing or malformed file yields an empty
//! table and a warning, so the chat can still start without data.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, warn};

use crate::types::RawTable;

/// Read a CSV file with a header row. Returns an empty table on any error.
pub fn load_tabular(path: impl AsRef<Path>) -> RawTable {
    let path = path.as_ref();
    match read_csv(path) {
        Ok(table) => {
            debug!(path = %path.display(), rows = table.len(), "loaded statement rows");
            table
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %format!("{e:#}"),
                "could not load statement; continuing without data"
            );
            RawTable::default()
        }
    }
}

fn read_csv(path: &Path) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr
        .headers()
        .with_context(|| format!("reading header of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut table = RawTable::new(headers);
    for result in rdr.records() {
        let record = result.with_context(|| format!("reading {}", path.display()))?;
        table.push_row(record.iter().map(str::to_string).collect());
    }

    Ok(table)
}
