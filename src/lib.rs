//! edinet-harvester: batch listing and download of EDINET disclosure filings
//!
//! The [`Harvester`] queries the EDINET document index one day at a time over
//! a window of days and downloads the PDF of each listed filing, reporting
//! which days and which documents succeeded or failed.

pub mod config;
pub mod edinet;
pub mod harvester;
pub mod models;

pub use config::Config;
pub use edinet::{DocumentRecord, DownloadFormat, EdinetClient, EdinetError};
pub use harvester::Harvester;
pub use models::{DownloadResult, HarvestReport, HarvestSummary, ListResult};
