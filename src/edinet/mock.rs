//! In-memory EDINET sources for tests

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::edinet::{DocumentQuery, DocumentRecord, DocumentRequest, DocumentSource, FetchFailure, IndexSource};

/// Canned outcome for one day or one document
#[derive(Debug, Clone)]
pub enum Canned<T> {
    Ok(T),
    HttpStatus(u16),
    ApiStatus(&'static str),
}

impl<T: Clone> Canned<T> {
    fn resolve(&self) -> Result<T, FetchFailure> {
        match self {
            Canned::Ok(value) => Ok(value.clone()),
            Canned::HttpStatus(status) => Err(FetchFailure::HttpStatus {
                status: *status,
                message: format!("mock status {}", status),
            }),
            Canned::ApiStatus(status) => Err(FetchFailure::ApiStatus {
                status: status.to_string(),
                message: "mock embedded status".to_string(),
            }),
        }
    }
}

/// Records every call; unknown dates list nothing, unknown documents 404
#[derive(Debug, Default)]
pub struct MockEdinet {
    days: HashMap<NaiveDate, Canned<Vec<DocumentRecord>>>,
    documents: HashMap<String, Canned<Vec<u8>>>,
    index_calls: Mutex<Vec<NaiveDate>>,
    document_calls: Mutex<Vec<String>>,
}

impl MockEdinet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(mut self, date: NaiveDate, outcome: Canned<Vec<DocumentRecord>>) -> Self {
        self.days.insert(date, outcome);
        self
    }

    pub fn with_document(mut self, doc_id: &str, outcome: Canned<Vec<u8>>) -> Self {
        self.documents.insert(doc_id.to_string(), outcome);
        self
    }

    pub fn index_calls(&self) -> Vec<NaiveDate> {
        self.index_calls.lock().unwrap().clone()
    }

    pub fn document_calls(&self) -> Vec<String> {
        self.document_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IndexSource for MockEdinet {
    async fn fetch_index(&self, query: &DocumentQuery) -> Result<Vec<DocumentRecord>, FetchFailure> {
        self.index_calls.lock().unwrap().push(query.target_date);
        match self.days.get(&query.target_date) {
            Some(outcome) => outcome.resolve(),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl DocumentSource for MockEdinet {
    async fn fetch_document(&self, request: &DocumentRequest) -> Result<Vec<u8>, FetchFailure> {
        self.document_calls.lock().unwrap().push(request.doc_id.clone());
        match self.documents.get(&request.doc_id) {
            Some(outcome) => outcome.resolve(),
            None => Canned::<Vec<u8>>::HttpStatus(404).resolve(),
        }
    }
}

pub fn record(doc_id: &str) -> DocumentRecord {
    DocumentRecord {
        doc_id: Some(doc_id.to_string()),
        filer_name: Some(format!("Filer of {}", doc_id)),
        ..Default::default()
    }
}
