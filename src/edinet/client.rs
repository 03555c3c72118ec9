//! HTTP access to the EDINET document index and content endpoints

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use tracing::debug;

use crate::config::{ApiKeyPlacement, Config};
use crate::edinet::{
    DocumentQuery, DocumentRecord, DocumentRequest, EdinetApi, EdinetError, EdinetErrorResponse,
    EdinetIndexResponse, FetchFailure,
};

/// Lists the filings disclosed on one date
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Single request, no retry. Records come back in upstream order.
    async fn fetch_index(&self, query: &DocumentQuery) -> Result<Vec<DocumentRecord>, FetchFailure>;
}

/// Fetches the binary content of one filing
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_document(&self, request: &DocumentRequest) -> Result<Vec<u8>, FetchFailure>;
}

#[async_trait]
impl<T: IndexSource + ?Sized> IndexSource for Arc<T> {
    async fn fetch_index(&self, query: &DocumentQuery) -> Result<Vec<DocumentRecord>, FetchFailure> {
        (**self).fetch_index(query).await
    }
}

#[async_trait]
impl<T: DocumentSource + ?Sized> DocumentSource for Arc<T> {
    async fn fetch_document(&self, request: &DocumentRequest) -> Result<Vec<u8>, FetchFailure> {
        (**self).fetch_document(request).await
    }
}

/// reqwest-backed client for both EDINET endpoints
#[derive(Debug, Clone)]
pub struct EdinetClient {
    client: Client,
    index_base_url: String,
    content_base_url: String,
    api_key_placement: ApiKeyPlacement,
}

impl EdinetClient {
    pub fn new(config: &Config) -> Result<Self, EdinetError> {
        if config.http.timeout_seconds == 0 {
            return Err(EdinetError::Config(
                "HTTP timeout must be at least one second".to_string(),
            ));
        }

        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            client,
            index_base_url: config.endpoints.index_base_url.trim_end_matches('/').to_string(),
            content_base_url: config.endpoints.content_base_url.trim_end_matches('/').to_string(),
            api_key_placement: config.endpoints.api_key_placement,
        })
    }

    fn with_api_key(&self, builder: RequestBuilder, api_key: &str) -> RequestBuilder {
        match self.api_key_placement {
            ApiKeyPlacement::Query => builder.query(&[(EdinetApi::KEY_QUERY_PARAM, api_key)]),
            ApiKeyPlacement::Header => builder.header(EdinetApi::KEY_HEADER, api_key),
        }
    }
}

#[async_trait]
impl IndexSource for EdinetClient {
    async fn fetch_index(&self, query: &DocumentQuery) -> Result<Vec<DocumentRecord>, FetchFailure> {
        let url = format!("{}{}", self.index_base_url, EdinetApi::DOCUMENTS_ENDPOINT);
        let date = query.date_param();

        debug!("Fetching EDINET documents for date: {}", date);

        let request = self
            .client
            .get(&url)
            .query(&[("date", date.as_str()), ("type", query.document_type.as_param())]);
        let response = self.with_api_key(request, &query.api_key).send().await?;

        let status = response.status();
        let response_text = response.text().await?;

        if status != StatusCode::OK {
            return Err(http_status_failure(status.as_u16(), response_text));
        }

        let index: EdinetIndexResponse = serde_json::from_str(&response_text)?;
        let metadata = index.metadata.ok_or(FetchFailure::MissingMetadata)?;
        if !metadata.is_success() {
            return Err(FetchFailure::ApiStatus {
                status: metadata.status.unwrap_or_else(|| "missing".to_string()),
                message: metadata.message.unwrap_or_default(),
            });
        }

        Ok(index.results)
    }
}

#[async_trait]
impl DocumentSource for EdinetClient {
    async fn fetch_document(&self, request: &DocumentRequest) -> Result<Vec<u8>, FetchFailure> {
        let url = format!(
            "{}{}/{}",
            self.content_base_url,
            EdinetApi::DOCUMENT_DOWNLOAD_ENDPOINT,
            request.doc_id
        );

        debug!("Downloading document from: {}", url);

        let builder = self.client.get(&url).query(&[("type", request.format.as_param())]);
        let response = self.with_api_key(builder, &request.api_key).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let response_text = response.text().await?;
            return Err(http_status_failure(status.as_u16(), response_text));
        }

        if is_json(&response) {
            // The content endpoint reports missing documents as a 200 JSON envelope
            let response_text = response.text().await?;
            return Err(embedded_failure(&response_text));
        }

        let content = response.bytes().await?;
        Ok(content.to_vec())
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false)
}

fn http_status_failure(status: u16, response_text: String) -> FetchFailure {
    match serde_json::from_str::<EdinetErrorResponse>(&response_text) {
        Ok(error_response) => FetchFailure::HttpStatus {
            status,
            message: error_response.message,
        },
        Err(_) => FetchFailure::HttpStatus {
            status,
            message: response_text,
        },
    }
}

fn embedded_failure(response_text: &str) -> FetchFailure {
    match serde_json::from_str::<EdinetIndexResponse>(response_text) {
        Ok(EdinetIndexResponse { metadata: Some(metadata), .. }) => FetchFailure::ApiStatus {
            status: metadata.status.unwrap_or_else(|| "missing".to_string()),
            message: metadata.message.unwrap_or_default(),
        },
        Ok(_) => FetchFailure::MissingMetadata,
        Err(e) => FetchFailure::Decode(e),
    }
}
