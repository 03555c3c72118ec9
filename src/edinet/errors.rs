//! EDINET-specific error types

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single request to the EDINET API did not produce a usable response
#[derive(Error, Debug)]
pub enum FetchFailure {
    /// Connection, TLS, timeout or body read failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("EDINET API error (status {status}): {message}")]
    HttpStatus {
        status: u16,
        message: String,
    },

    /// HTTP 200 whose embedded `metadata.status` is not a success
    #[error("EDINET API reported status {status}: {message}")]
    ApiStatus {
        status: String,
        message: String,
    },

    #[error("EDINET response has no metadata block")]
    MissingMetadata,

    #[error("Failed to parse EDINET response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchFailure {
    /// The offending status code, HTTP or embedded
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchFailure::Transport(e) => e.status().map(|s| s.as_u16()),
            FetchFailure::HttpStatus { status, .. } => Some(*status),
            FetchFailure::ApiStatus { status, .. } => status.parse().ok(),
            FetchFailure::MissingMetadata | FetchFailure::Decode(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchFailure::Transport(e) if e.is_timeout())
    }
}

#[derive(Error, Debug)]
pub enum EdinetError {
    #[error("EDINET API key not configured. Set EDINET_API_KEY environment variable")]
    MissingApiKey,

    #[error("Duration must cover at least one day and stay within the supported date range")]
    InvalidDuration,

    #[error("Document ID must not be empty")]
    EmptyDocumentId,

    #[error("Failed to fetch EDINET document index for {date}: {cause}")]
    IndexFetch {
        date: NaiveDate,
        #[source]
        cause: FetchFailure,
    },

    #[error("Failed to download document {doc_id}: {cause}")]
    DocumentDownload {
        doc_id: String,
        #[source]
        cause: FetchFailure,
    },

    #[error("Failed to write document {doc_id} to {}: {source}", .path.display())]
    Persistence {
        doc_id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create output directory {}: {source}", .path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EdinetError {
    /// Status code of the failed request, if the failure came from one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            EdinetError::IndexFetch { cause, .. } | EdinetError::DocumentDownload { cause, .. } => {
                cause.status_code()
            }
            _ => None,
        }
    }
}
