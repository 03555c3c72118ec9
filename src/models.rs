use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use crate::edinet::{DocumentRecord, EdinetError};

/// Outcome of a multi-day listing.
///
/// Every requested date ends up in exactly one of `success_dates` or
/// `error_dates`. Records are concatenated in the order the dates were
/// queried.
#[derive(Debug, Default)]
pub struct ListResult {
    records: Vec<ListedRecord>,
    success_dates: Vec<NaiveDate>,
    error_dates: Vec<NaiveDate>,
    errors: Vec<EdinetError>,
    seen: HashSet<NaiveDate>,
}

/// A record together with the date whose listing returned it
#[derive(Debug, Clone, PartialEq)]
pub struct ListedRecord {
    pub listed_on: NaiveDate,
    pub record: DocumentRecord,
}

impl ListResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one day's outcome in. A date already recorded is ignored.
    pub fn record_day(&mut self, date: NaiveDate, outcome: Result<Vec<DocumentRecord>, EdinetError>) {
        if !self.seen.insert(date) {
            return;
        }
        match outcome {
            Ok(records) => {
                self.records.extend(
                    records
                        .into_iter()
                        .map(|record| ListedRecord { listed_on: date, record }),
                );
                self.success_dates.push(date);
            }
            Err(e) => {
                self.error_dates.push(date);
                self.errors.push(e);
            }
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.records.iter().map(|listed| &listed.record)
    }

    pub fn listed_records(&self) -> &[ListedRecord] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn success_dates(&self) -> &[NaiveDate] {
        &self.success_dates
    }

    pub fn error_dates(&self) -> &[NaiveDate] {
        &self.error_dates
    }

    /// Per-day failure causes, aligned with `error_dates`
    pub fn errors(&self) -> &[EdinetError] {
        &self.errors
    }

    pub fn success_count(&self) -> usize {
        self.success_dates.len()
    }

    pub fn error_count(&self) -> usize {
        self.error_dates.len()
    }

    pub fn requested_count(&self) -> usize {
        self.success_count() + self.error_count()
    }
}

/// Outcome of a batch download.
///
/// Every requested document ID ends up in exactly one of `success_ids` or
/// `error_ids`.
#[derive(Debug, Default)]
pub struct DownloadResult {
    success_ids: Vec<String>,
    error_ids: Vec<String>,
    written: Vec<PathBuf>,
    errors: Vec<EdinetError>,
    skipped: usize,
    seen: HashSet<String>,
}

impl DownloadResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `doc_id` already has an outcome
    pub fn contains(&self, doc_id: &str) -> bool {
        self.seen.contains(doc_id)
    }

    /// Fold one document's outcome in. An ID already recorded is ignored.
    pub fn record_document(&mut self, doc_id: &str, outcome: Result<PathBuf, EdinetError>) {
        if !self.seen.insert(doc_id.to_string()) {
            return;
        }
        match outcome {
            Ok(path) => {
                self.success_ids.push(doc_id.to_string());
                self.written.push(path);
            }
            Err(e) => {
                self.error_ids.push(doc_id.to_string());
                self.errors.push(e);
            }
        }
    }

    /// Count a record that could not be requested at all
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn success_ids(&self) -> &[String] {
        &self.success_ids
    }

    pub fn error_ids(&self) -> &[String] {
        &self.error_ids
    }

    /// Files written, aligned with `success_ids`
    pub fn written_paths(&self) -> &[PathBuf] {
        &self.written
    }

    /// Per-document failure causes, aligned with `error_ids`
    pub fn errors(&self) -> &[EdinetError] {
        &self.errors
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    pub fn success_count(&self) -> usize {
        self.success_ids.len()
    }

    pub fn error_count(&self) -> usize {
        self.error_ids.len()
    }

    pub fn requested_count(&self) -> usize {
        self.success_count() + self.error_count()
    }
}

/// Listing followed by download of everything listed
#[derive(Debug)]
pub struct HarvestReport {
    pub listing: ListResult,
    pub downloads: DownloadResult,
}

impl HarvestReport {
    pub fn summary(&self) -> HarvestSummary {
        HarvestSummary {
            days_requested: self.listing.requested_count(),
            days_succeeded: self.listing.success_count(),
            days_failed: self.listing.error_count(),
            documents_listed: self.listing.record_count(),
            documents_requested: self.downloads.requested_count(),
            documents_succeeded: self.downloads.success_count(),
            documents_failed: self.downloads.error_count(),
            documents_skipped: self.downloads.skipped_count(),
        }
    }
}

/// Requested / succeeded / failed counts for both phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestSummary {
    pub days_requested: usize,
    pub days_succeeded: usize,
    pub days_failed: usize,
    pub documents_listed: usize,
    pub documents_requested: usize,
    pub documents_succeeded: usize,
    pub documents_failed: usize,
    pub documents_skipped: usize,
}

impl fmt::Display for HarvestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Listing:   {} days requested, {} succeeded, {} failed ({} documents listed)",
            self.days_requested, self.days_succeeded, self.days_failed, self.documents_listed
        )?;
        write!(
            f,
            "Downloads: {} documents requested, {} succeeded, {} failed",
            self.documents_requested, self.documents_succeeded, self.documents_failed
        )?;
        if self.documents_skipped > 0 {
            write!(f, ", {} skipped without document ID", self.documents_skipped)?;
        }
        Ok(())
    }
}
