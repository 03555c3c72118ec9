//! CSV export of listing results

use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::edinet::EdinetError;
use crate::models::{ListResult, ListedRecord};

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "listDate")]
    list_date: String,
    #[serde(rename = "docID")]
    doc_id: Option<&'a str>,
    #[serde(rename = "edinetCode")]
    edinet_code: Option<&'a str>,
    #[serde(rename = "secCode")]
    sec_code: Option<&'a str>,
    #[serde(rename = "filerName")]
    filer_name: Option<&'a str>,
    #[serde(rename = "docDescription")]
    doc_description: Option<&'a str>,
    #[serde(rename = "submitDateTime")]
    submit_date_time: Option<&'a str>,
    #[serde(rename = "docTypeCode")]
    doc_type_code: Option<&'a str>,
    #[serde(rename = "formCode")]
    form_code: Option<&'a str>,
    #[serde(rename = "parentDocID")]
    parent_doc_id: Option<&'a str>,
    #[serde(rename = "docInfoEditStatus")]
    doc_info_edit_status: Option<&'a str>,
    #[serde(rename = "withdrawalStatus")]
    withdrawal_status: Option<&'a str>,
    #[serde(rename = "pdfFlag")]
    pdf_flag: Option<&'a str>,
}

impl<'a> From<&'a ListedRecord> for CsvRow<'a> {
    fn from(listed: &'a ListedRecord) -> Self {
        let record = &listed.record;
        Self {
            list_date: listed.listed_on.format("%Y-%m-%d").to_string(),
            doc_id: record.doc_id.as_deref(),
            edinet_code: record.edinet_code.as_deref(),
            sec_code: record.sec_code.as_deref(),
            filer_name: record.filer_name.as_deref(),
            doc_description: record.doc_description.as_deref(),
            submit_date_time: record.submit_date_time.as_deref(),
            doc_type_code: record.doc_type_code.as_deref(),
            form_code: record.form_code.as_deref(),
            parent_doc_id: record.parent_doc_id.as_deref(),
            doc_info_edit_status: record.doc_info_edit_status.as_deref(),
            withdrawal_status: record.withdrawal_status.as_deref(),
            pdf_flag: record.pdf_flag.as_deref(),
        }
    }
}

/// Write the listed records as CSV, one row per record in listing order
pub fn write_csv<W: Write>(listing: &ListResult, writer: W) -> Result<usize, EdinetError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for listed in listing.listed_records() {
        csv_writer.serialize(CsvRow::from(listed))?;
    }
    csv_writer.flush()?;
    Ok(listing.record_count())
}

/// Write the listed records to a CSV file, creating parent directories
pub fn export_csv(listing: &ListResult, path: &Path) -> Result<usize, EdinetError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_csv(listing, file)
}
