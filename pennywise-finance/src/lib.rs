//! pennywise-finance: aggregate summaries and regex-extracted monthly totals

pub mod monthly;
pub mod summary;

pub use monthly::{extract_monthly_totals, month_abbrev, MonthlyTotals};
pub use summary::{summarize, Summary, NO_DATA};
