//! EDINET (Japan Financial Services Agency) module
//!
//! Access to EDINET, Japan's electronic disclosure system: the per-day
//! document index, per-document content downloads, and the batch loops that
//! run them over a window of days or a list of filings.

pub mod types;
pub mod client;
pub mod indexer;
pub mod downloader;
pub mod errors;
pub mod export;

#[cfg(test)]
pub(crate) mod mock;

pub use types::*;
pub use errors::{EdinetError, FetchFailure};
pub use client::{DocumentSource, EdinetClient, IndexSource};

// Re-export commonly used functions
pub use indexer::{list_documents, window_dates, window_start};
pub use downloader::{download_all, download_document};
pub use export::{export_csv, write_csv};
