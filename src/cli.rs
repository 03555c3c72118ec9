use clap::{Parser, Subcommand};
use chrono::NaiveDate;
use std::path::PathBuf;

use edinet_harvester::DownloadFormat;

#[derive(Parser)]
#[command(name = "edinet-harvester")]
#[command(about = "List EDINET financial disclosure filings and download their documents")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List documents submitted over a window of days
    List {
        /// Number of days to cover, counting back from the anchor date
        #[arg(long)]
        days: Option<u32>,

        /// Most recent date of the window (YYYY-MM-DD), defaults to today
        #[arg(long)]
        anchor: Option<NaiveDate>,

        /// Write the listing to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Download every document submitted on one date
    Download {
        /// Submission date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Document format to download (pdf, zip, attachments, english, csv)
        #[arg(long, default_value = "pdf")]
        format: String,
    },

    /// Download a single document by its ID
    Fetch {
        /// EDINET document ID (e.g. S100TEST)
        #[arg(long)]
        doc_id: String,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Document format to download (pdf, zip, attachments, english, csv)
        #[arg(long, default_value = "pdf")]
        format: String,
    },

    /// List a window of days, then download every listed document
    Harvest {
        /// Number of days to cover, counting back from the anchor date
        #[arg(long)]
        days: Option<u32>,

        /// Most recent date of the window (YYYY-MM-DD), defaults to today
        #[arg(long)]
        anchor: Option<NaiveDate>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the listing to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Document format to download (pdf, zip, attachments, english, csv)
        #[arg(long, default_value = "pdf")]
        format: String,
    },
}

impl Commands {
    pub fn parse_format(format: &str) -> Result<DownloadFormat, anyhow::Error> {
        DownloadFormat::parse(format).ok_or_else(|| {
            anyhow::anyhow!(
                "Unsupported document format: {}. Supported formats: pdf, zip, attachments, english, csv",
                format
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harvest_arguments() {
        let cli = Cli::try_parse_from([
            "edinet-harvester",
            "harvest",
            "--days",
            "3",
            "--anchor",
            "2024-05-17",
            "-o",
            "out",
        ])
        .unwrap();

        match cli.command {
            Commands::Harvest { days, anchor, output, csv, format } => {
                assert_eq!(days, Some(3));
                assert_eq!(anchor, NaiveDate::from_ymd_opt(2024, 5, 17));
                assert_eq!(output, Some(PathBuf::from("out")));
                assert!(csv.is_none());
                assert_eq!(format, "pdf");
            }
            _ => panic!("expected harvest command"),
        }
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        assert!(Cli::try_parse_from(["edinet-harvester", "download", "--date", "17/05/2024"]).is_err());
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(Commands::parse_format("pdf").unwrap(), DownloadFormat::Pdf);
        assert!(Commands::parse_format("docx").is_err());
    }
}
