//! Shared EDINET types and data structures

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// EDINET API response containing metadata and document results
#[derive(Debug, Deserialize)]
pub struct EdinetIndexResponse {
    /// Metadata about the response, including the embedded status
    pub metadata: Option<EdinetMetaData>,
    /// List of documents in the response
    #[serde(default)]
    pub results: Vec<DocumentRecord>,
}

/// Metadata information for EDINET API responses
#[derive(Debug, Deserialize)]
pub struct EdinetMetaData {
    /// Result set information
    pub resultset: Option<EdinetResultSet>,
    /// Embedded status code, `"200"` on success
    #[serde(default, deserialize_with = "status_string")]
    pub status: Option<String>,
    /// Embedded status message
    pub message: Option<String>,
}

impl EdinetMetaData {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(EdinetApi::SUCCESS_STATUS)
    }
}

/// Information about the result set
#[derive(Debug, Deserialize)]
pub struct EdinetResultSet {
    pub count: i64,
}

/// EDINET API error response structure (returned with a non-200 status)
#[derive(Debug, Deserialize)]
pub struct EdinetErrorResponse {
    #[serde(rename = "statusCode", alias = "StatusCode")]
    pub status_code: u16,
    pub message: String,
}

/// One filing row of the document index.
///
/// The upstream schema is not contractually fixed: every named field is
/// optional and anything not named here is kept in `extra`, so a record
/// serializes back to the fields it was read from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Document ID - required for downloading
    #[serde(rename = "docID", default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,

    /// EDINET code of the filer
    #[serde(rename = "edinetCode", default, skip_serializing_if = "Option::is_none")]
    pub edinet_code: Option<String>,

    /// Securities code (ticker symbol)
    #[serde(rename = "secCode", default, skip_serializing_if = "Option::is_none")]
    pub sec_code: Option<String>,

    /// Company name (filer name)
    #[serde(rename = "filerName", default, skip_serializing_if = "Option::is_none")]
    pub filer_name: Option<String>,

    #[serde(rename = "docDescription", default, skip_serializing_if = "Option::is_none")]
    pub doc_description: Option<String>,

    /// Submission timestamp as sent, `YYYY-MM-DD HH:MM`
    #[serde(rename = "submitDateTime", default, skip_serializing_if = "Option::is_none")]
    pub submit_date_time: Option<String>,

    #[serde(rename = "docTypeCode", default, skip_serializing_if = "Option::is_none")]
    pub doc_type_code: Option<String>,

    #[serde(rename = "formCode", default, skip_serializing_if = "Option::is_none")]
    pub form_code: Option<String>,

    #[serde(rename = "parentDocID", default, skip_serializing_if = "Option::is_none")]
    pub parent_doc_id: Option<String>,

    #[serde(rename = "docInfoEditStatus", default, skip_serializing_if = "Option::is_none")]
    pub doc_info_edit_status: Option<String>,

    #[serde(rename = "withdrawalStatus", default, skip_serializing_if = "Option::is_none")]
    pub withdrawal_status: Option<String>,

    /// "1" when a PDF rendition exists
    #[serde(rename = "pdfFlag", default, skip_serializing_if = "Option::is_none")]
    pub pdf_flag: Option<String>,

    /// Fields this crate does not name
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DocumentRecord {
    /// Document ID, if present and non-blank
    pub fn doc_id(&self) -> Option<&str> {
        self.doc_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// Parsed submission timestamp; the raw string is left untouched
    pub fn submitted_at(&self) -> Option<NaiveDateTime> {
        let raw = self.submit_date_time.as_deref()?.trim();
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
            .ok()
    }

    /// Any field by its upstream name, named or residual
    pub fn field(&self, name: &str) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.get(name).cloned(),
            _ => None,
        }
    }

    /// Tab-separated summary line used in logs and CLI output
    pub fn summary_line(&self) -> String {
        [
            self.edinet_code.as_deref(),
            self.doc_id.as_deref(),
            self.filer_name.as_deref(),
            self.doc_description.as_deref(),
            self.submit_date_time.as_deref(),
        ]
        .iter()
        .map(|v| v.unwrap_or("-"))
        .collect::<Vec<_>>()
        .join("\t")
    }
}

/// `type` parameter of the document index endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// `type=2`: metadata and the list of submitted documents
    DocumentList,
}

impl IndexType {
    pub fn as_param(&self) -> &'static str {
        match self {
            IndexType::DocumentList => "2",
        }
    }
}

/// `type` parameter of the document content endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadFormat {
    /// XBRL and audit report bundle
    Zip,
    #[default]
    Pdf,
    /// Attachments bundle
    Attachments,
    /// English documents bundle
    English,
    /// XBRL converted to CSV bundle
    Csv,
}

impl DownloadFormat {
    pub fn as_param(&self) -> &'static str {
        match self {
            DownloadFormat::Zip => "1",
            DownloadFormat::Pdf => "2",
            DownloadFormat::Attachments => "3",
            DownloadFormat::English => "4",
            DownloadFormat::Csv => "5",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            DownloadFormat::Pdf => "pdf",
            _ => "zip",
        }
    }

    pub fn parse(format: &str) -> Option<Self> {
        match format.to_lowercase().as_str() {
            "zip" | "xbrl" => Some(DownloadFormat::Zip),
            "pdf" => Some(DownloadFormat::Pdf),
            "attachments" | "attach" => Some(DownloadFormat::Attachments),
            "english" | "en" => Some(DownloadFormat::English),
            "csv" => Some(DownloadFormat::Csv),
            _ => None,
        }
    }
}

/// One document index request, built per call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentQuery {
    pub target_date: NaiveDate,
    pub document_type: IndexType,
    pub api_key: String,
}

impl DocumentQuery {
    /// Query for the financial disclosure listing of `target_date`
    pub fn new(target_date: NaiveDate, api_key: &str) -> Self {
        Self {
            target_date,
            document_type: IndexType::DocumentList,
            api_key: api_key.to_string(),
        }
    }

    pub fn date_param(&self) -> String {
        self.target_date.format("%Y-%m-%d").to_string()
    }
}

/// One document content request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequest {
    pub doc_id: String,
    pub format: DownloadFormat,
    pub api_key: String,
}

impl DocumentRequest {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.doc_id, self.format.file_extension())
    }
}

/// EDINET API endpoints and constants
pub struct EdinetApi;

impl EdinetApi {
    /// Base URL of the document index endpoint
    pub const INDEX_BASE_URL: &'static str = "https://disclosure.edinet-fsa.go.jp";
    /// Base URL of the document content endpoint
    pub const CONTENT_BASE_URL: &'static str = "https://api.edinet-fsa.go.jp";
    /// Documents listing endpoint
    pub const DOCUMENTS_ENDPOINT: &'static str = "/api/v2/documents.json";
    /// Document download endpoint (without document ID)
    pub const DOCUMENT_DOWNLOAD_ENDPOINT: &'static str = "/api/v2/documents";
    /// Query parameter carrying the subscription key
    pub const KEY_QUERY_PARAM: &'static str = "Subscription-Key";
    /// Header carrying the subscription key
    pub const KEY_HEADER: &'static str = "Ocp-Apim-Subscription-Key";
    /// Embedded metadata status of a successful response
    pub const SUCCESS_STATUS: &'static str = "200";
}

/// Accepts the embedded status as either a JSON string or number
fn status_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
