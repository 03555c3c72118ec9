//! EDINET document downloading functionality

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::edinet::{DocumentRecord, DocumentRequest, DocumentSource, DownloadFormat, EdinetError};
use crate::models::DownloadResult;

/// Download one document and write it to `<output_dir>/<doc_id>.<ext>`.
///
/// The directory is created if needed and an existing file of the same name
/// is overwritten.
pub async fn download_document<S>(
    source: &S,
    request: &DocumentRequest,
    output_dir: &Path,
) -> Result<PathBuf, EdinetError>
where
    S: DocumentSource + ?Sized,
{
    if request.doc_id.trim().is_empty() {
        return Err(EdinetError::EmptyDocumentId);
    }

    let content = source
        .fetch_document(request)
        .await
        .map_err(|cause| EdinetError::DocumentDownload {
            doc_id: request.doc_id.clone(),
            cause,
        })?;

    let output_path = output_dir.join(request.file_name());
    let persistence_error = |source| EdinetError::Persistence {
        doc_id: request.doc_id.clone(),
        path: output_path.clone(),
        source,
    };

    std::fs::create_dir_all(output_dir).map_err(persistence_error)?;
    std::fs::write(&output_path, &content).map_err(persistence_error)?;

    debug!("Wrote {} bytes to {}", content.len(), output_path.display());
    Ok(output_path)
}

/// Download every record in order, recording each outcome.
///
/// Only an output directory that cannot be created fails the batch; any
/// single document failure is logged and recorded.
pub async fn download_all<S>(
    source: &S,
    records: &[DocumentRecord],
    api_key: &str,
    format: DownloadFormat,
    output_dir: &Path,
    delay: Duration,
) -> Result<DownloadResult, EdinetError>
where
    S: DocumentSource + ?Sized,
{
    std::fs::create_dir_all(output_dir).map_err(|source| EdinetError::OutputDirectory {
        path: output_dir.to_path_buf(),
        source,
    })?;

    info!(
        "Downloading {} EDINET documents to {}",
        records.len(),
        output_dir.display()
    );

    let mut result = DownloadResult::new();
    let mut requested = 0usize;

    for (index, record) in records.iter().enumerate() {
        let Some(doc_id) = record.doc_id() else {
            warn!("Skipping record without document ID: {}", record.summary_line());
            result.record_skipped();
            continue;
        };

        if result.contains(doc_id) {
            debug!("Document {} already handled in this batch", doc_id);
            continue;
        }

        if requested > 0 && !delay.is_zero() {
            // Rate limiting - EDINET API has usage limits
            tokio::time::sleep(delay).await;
        }
        requested += 1;

        info!(
            "Downloading document {}/{}: {}",
            index + 1,
            records.len(),
            record.summary_line()
        );

        let request = DocumentRequest {
            doc_id: doc_id.to_string(),
            format,
            api_key: api_key.to_string(),
        };

        let outcome = download_document(source, &request, output_dir).await;
        match &outcome {
            Ok(path) => info!("✓ Successfully downloaded: {}", path.display()),
            Err(e) => warn!("✗ {}", error_chain(e)),
        }

        result.record_document(doc_id, outcome);
    }

    info!(
        "Downloaded {} EDINET documents, {} failed",
        result.success_count(),
        result.error_count()
    );
    Ok(result)
}

/// Error message followed by each underlying cause
fn error_chain(error: &EdinetError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edinet::mock::{record, Canned, MockEdinet};
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn pdf_request(doc_id: &str) -> DocumentRequest {
        DocumentRequest {
            doc_id: doc_id.to_string(),
            format: DownloadFormat::Pdf,
            api_key: "key".to_string(),
        }
    }

    fn pdf_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_download_writes_pdf_named_after_doc_id() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("reports");
        let source = MockEdinet::new().with_document("S100TEST", Canned::Ok(b"%PDF-1.7".to_vec()));

        let path = download_document(&source, &pdf_request("S100TEST"), &output_dir)
            .await
            .unwrap();

        assert_eq!(path, output_dir.join("S100TEST.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_redownload_overwrites_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let first = MockEdinet::new().with_document("S100TEST", Canned::Ok(b"first".to_vec()));
        let second = MockEdinet::new().with_document("S100TEST", Canned::Ok(b"second".to_vec()));

        download_document(&first, &pdf_request("S100TEST"), temp_dir.path())
            .await
            .unwrap();
        let path = download_document(&second, &pdf_request("S100TEST"), temp_dir.path())
            .await
            .unwrap();

        assert_eq!(pdf_files(temp_dir.path()), vec!["S100TEST.pdf"]);
        assert_eq!(std::fs::read(path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_failed_download_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let source = MockEdinet::new().with_document("B2", Canned::HttpStatus(404));

        let err = download_document(&source, &pdf_request("B2"), temp_dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, EdinetError::DocumentDownload { ref doc_id, .. } if doc_id == "B2"));
        assert_eq!(err.status_code(), Some(404));
        assert!(pdf_files(temp_dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_empty_doc_id_is_rejected_before_request() {
        let temp_dir = TempDir::new().unwrap();
        let source = MockEdinet::new();

        let err = download_document(&source, &pdf_request(" "), temp_dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, EdinetError::EmptyDocumentId));
        assert!(source.document_calls().is_empty());
    }

    #[tokio::test]
    async fn test_unwritable_output_is_persistence_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let source = MockEdinet::new().with_document("A1", Canned::Ok(b"%PDF".to_vec()));

        let err = download_document(&source, &pdf_request("A1"), &blocker)
            .await
            .unwrap_err();

        assert!(matches!(err, EdinetError::Persistence { .. }));
    }

    #[tokio::test]
    async fn test_download_all_isolates_failures() {
        let temp_dir = TempDir::new().unwrap();
        let source = MockEdinet::new()
            .with_document("A1", Canned::Ok(b"%PDF-A1".to_vec()))
            .with_document("B2", Canned::HttpStatus(404))
            .with_document("C3", Canned::Ok(b"%PDF-C3".to_vec()));
        let records = vec![record("A1"), record("B2"), record("C3")];

        let result = download_all(
            &source,
            &records,
            "key",
            DownloadFormat::Pdf,
            temp_dir.path(),
            Duration::ZERO,
        )
        .await
        .unwrap();

        assert_eq!(source.document_calls(), vec!["A1", "B2", "C3"]);
        assert_eq!(result.success_ids(), &["A1".to_string(), "C3".to_string()]);
        assert_eq!(result.error_ids(), &["B2".to_string()]);
        assert_eq!(pdf_files(temp_dir.path()), vec!["A1.pdf", "C3.pdf"]);
    }

    #[tokio::test]
    async fn test_download_all_skips_missing_and_repeated_ids() {
        let temp_dir = TempDir::new().unwrap();
        let source = MockEdinet::new().with_document("A1", Canned::Ok(b"%PDF".to_vec()));
        let records = vec![record("A1"), DocumentRecord::default(), record("A1")];

        let result = download_all(
            &source,
            &records,
            "key",
            DownloadFormat::Pdf,
            temp_dir.path(),
            Duration::ZERO,
        )
        .await
        .unwrap();

        assert_eq!(source.document_calls(), vec!["A1"]);
        assert_eq!(result.requested_count(), 1);
        assert_eq!(result.skipped_count(), 1);
    }

    #[tokio::test]
    async fn test_download_all_fails_when_output_dir_cannot_be_created() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let source = MockEdinet::new();

        let err = download_all(
            &source,
            &[record("A1")],
            "key",
            DownloadFormat::Pdf,
            &blocker.join("sub"),
            Duration::ZERO,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, EdinetError::OutputDirectory { .. }));
        assert!(source.document_calls().is_empty());
    }

    #[tokio::test]
    async fn test_every_requested_id_lands_in_exactly_one_set() {
        let temp_dir = TempDir::new().unwrap();
        let ids: Vec<String> = (0..25).map(|i| format!("S100{:04}", i)).collect();
        let source = ids.iter().enumerate().fold(MockEdinet::new(), |source, (i, id)| {
            if i % 3 == 0 {
                source.with_document(id, Canned::HttpStatus(503))
            } else {
                source.with_document(id, Canned::Ok(id.as_bytes().to_vec()))
            }
        });
        let records: Vec<_> = ids.iter().map(|id| record(id)).collect();

        let result = download_all(
            &source,
            &records,
            "key",
            DownloadFormat::Pdf,
            temp_dir.path(),
            Duration::ZERO,
        )
        .await
        .unwrap();

        let successes: HashSet<_> = result.success_ids().iter().collect();
        let errors: HashSet<_> = result.error_ids().iter().collect();
        assert!(successes.is_disjoint(&errors));
        assert_eq!(successes.len() + errors.len(), ids.len());
        assert!(ids.iter().all(|id| successes.contains(id) || errors.contains(id)));
    }

    #[test]
    fn test_error_chain_includes_cause() {
        let err = EdinetError::Persistence {
            doc_id: "A1".to_string(),
            path: PathBuf::from("A1.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        let text = error_chain(&err);
        assert!(text.contains("disk full"));
        assert_eq!(text.matches("disk full").count(), 1);
    }
}
