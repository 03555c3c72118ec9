//! The EDINET document harvester: listing and batch download composed

use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::edinet::{
    self, DocumentRecord, DocumentRequest, DocumentSource, DownloadFormat, EdinetClient,
    EdinetError, IndexSource,
};
use crate::models::{DownloadResult, HarvestReport, ListResult};

/// Lists EDINET filings and downloads their documents, one request at a time
#[derive(Debug, Clone)]
pub struct Harvester<I = EdinetClient, D = EdinetClient> {
    index: I,
    documents: D,
    api_key: String,
    output_dir: PathBuf,
    format: DownloadFormat,
    api_delay: Duration,
    download_delay: Duration,
}

impl Harvester<EdinetClient, EdinetClient> {
    /// Harvester backed by the live EDINET API
    pub fn from_config(config: &Config) -> Result<Self, EdinetError> {
        let client = EdinetClient::new(config)?;
        Self::with_sources(config, client.clone(), client)
    }
}

impl<I, D> Harvester<I, D>
where
    I: IndexSource,
    D: DocumentSource,
{
    /// Fails only if the configuration has no usable API key
    pub fn with_sources(config: &Config, index: I, documents: D) -> Result<Self, EdinetError> {
        Ok(Self {
            index,
            documents,
            api_key: config.api_key()?.to_string(),
            output_dir: config.output_dir.clone(),
            format: DownloadFormat::Pdf,
            api_delay: config.edinet_api_delay(),
            download_delay: config.edinet_download_delay(),
        })
    }

    pub fn with_format(mut self, format: DownloadFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn format(&self) -> DownloadFormat {
        self.format
    }

    /// List `duration_days` days ending at `anchor` (today if `None`), most recent first
    pub async fn list_documents(
        &self,
        duration_days: u32,
        anchor: Option<NaiveDate>,
    ) -> Result<ListResult, EdinetError> {
        let anchor = anchor.unwrap_or_else(|| Local::now().date_naive());
        edinet::list_documents(&self.index, &self.api_key, duration_days, anchor, self.api_delay)
            .await
    }

    /// Download one document into the output directory
    pub async fn download_document(&self, doc_id: &str) -> Result<PathBuf, EdinetError> {
        let request = DocumentRequest {
            doc_id: doc_id.trim().to_string(),
            format: self.format,
            api_key: self.api_key.clone(),
        };
        edinet::download_document(&self.documents, &request, &self.output_dir).await
    }

    /// Download every record in the given order
    pub async fn download_all(&self, records: &[DocumentRecord]) -> Result<DownloadResult, EdinetError> {
        edinet::download_all(
            &self.documents,
            records,
            &self.api_key,
            self.format,
            &self.output_dir,
            self.download_delay,
        )
        .await
    }

    /// List one day, then download everything it listed
    pub async fn download_documents_for_date(&self, date: NaiveDate) -> Result<HarvestReport, EdinetError> {
        info!("Harvesting EDINET documents submitted on {}", date);
        self.harvest(1, Some(date)).await
    }

    /// List a window of days, then download everything listed
    pub async fn harvest(
        &self,
        duration_days: u32,
        anchor: Option<NaiveDate>,
    ) -> Result<HarvestReport, EdinetError> {
        let listing = self.list_documents(duration_days, anchor).await?;
        let records: Vec<DocumentRecord> = listing.records().cloned().collect();
        let downloads = self.download_all(&records).await?;

        let report = HarvestReport { listing, downloads };
        info!("Harvest finished\n{}", report.summary());
        Ok(report)
    }
}
