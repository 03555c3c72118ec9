//! EDINET document listing across a window of days

use chrono::{Days, NaiveDate};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::edinet::{DocumentQuery, EdinetError, IndexSource};
use crate::models::ListResult;

/// Oldest date of a listing window, rejecting empty windows and windows
/// reaching past the earliest representable date
pub fn window_start(anchor: NaiveDate, duration_days: u32) -> Result<NaiveDate, EdinetError> {
    if duration_days == 0 {
        return Err(EdinetError::InvalidDuration);
    }
    anchor
        .checked_sub_days(Days::new(u64::from(duration_days - 1)))
        .ok_or(EdinetError::InvalidDuration)
}

fn window(anchor: NaiveDate, duration_days: u32) -> impl Iterator<Item = NaiveDate> {
    (0..duration_days).filter_map(move |offset| anchor.checked_sub_days(Days::new(u64::from(offset))))
}

/// Dates of a listing window, `anchor` first, strictly descending
pub fn window_dates(anchor: NaiveDate, duration_days: u32) -> Result<Vec<NaiveDate>, EdinetError> {
    window_start(anchor, duration_days)?;
    Ok(window(anchor, duration_days).collect())
}

/// List the documents disclosed on each of the `duration_days` days ending at `anchor`.
///
/// Days are queried one at a time, most recent first. A failed day is logged
/// and recorded in the result; it never stops the remaining days.
pub async fn list_documents<S>(
    source: &S,
    api_key: &str,
    duration_days: u32,
    anchor: NaiveDate,
    delay: Duration,
) -> Result<ListResult, EdinetError>
where
    S: IndexSource + ?Sized,
{
    let oldest = window_start(anchor, duration_days)?;

    let start_time = Instant::now();
    info!(
        "Listing EDINET documents for {} days from {} back to {}",
        duration_days, anchor, oldest
    );

    let mut result = ListResult::new();

    for (index, date) in window(anchor, duration_days).enumerate() {
        if index > 0 && !delay.is_zero() {
            // Rate limiting
            tokio::time::sleep(delay).await;
        }

        let query = DocumentQuery::new(date, api_key);
        let outcome = source
            .fetch_index(&query)
            .await
            .map_err(|cause| EdinetError::IndexFetch { date, cause });

        match &outcome {
            Ok(records) if records.is_empty() => debug!("No documents found for {}", date),
            Ok(records) => info!(
                "Listed {} documents for {} ({}/{})",
                records.len(),
                date,
                index + 1,
                duration_days
            ),
            Err(e) => warn!("✗ {}", e),
        }

        result.record_day(date, outcome);
    }

    info!(
        "EDINET listing complete: {} documents, {} days succeeded, {} days failed in {:.1}s",
        result.record_count(),
        result.success_count(),
        result.error_count(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(result)
}
