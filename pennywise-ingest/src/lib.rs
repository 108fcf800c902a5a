//! pennywise-ingest: statement loading (CSV rows / PDF text), normalization and export.

pub mod document;
pub mod export;
pub mod normalize;
pub mod tabular;
pub mod types;

pub use document::{excerpt_pages, load_document_text, PageSource, PdfFile, DEFAULT_MAX_CHARS};
pub use export::write_records_csv;
pub use normalize::normalize;
pub use tabular::load_tabular;
pub use types::RawTable;
