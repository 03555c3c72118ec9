use clap::Parser;
use anyhow::Result;
use tracing::{info, error};

mod cli;

use cli::{Cli, Commands};
use edinet_harvester::{edinet, Config, DownloadFormat, Harvester, ListResult};

#[tokio::main]
async fn main() -> Result<()> {
    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "edinet_harvester=info");
    }

    // Initialize logging to both console and file
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

    let file_appender = tracing_appender::rolling::never(".", "edinet-harvester.log");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_default_env())
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env())
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    if let Err(e) = run(cli.command, &mut config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Commands, config: &mut Config) -> Result<()> {
    match command {
        Commands::List { days, anchor, csv } => {
            let days = days.unwrap_or(config.duration_days);
            let harvester = Harvester::from_config(config)?;

            info!("Listing EDINET documents for {} days", days);
            let listing = harvester.list_documents(days, anchor).await?;

            println!("edinetCode\tdocID\tfilerName\tdocDescription\tsubmitDateTime");
            for record in listing.records() {
                println!("{}", record.summary_line());
            }
            if let Some(path) = csv {
                export_listing(&listing, &path)?;
            }
            print_listing_summary(days, &listing);
        }

        Commands::Download { date, output, format } => {
            let harvester = build_harvester(config, output, &format)?;

            let report = harvester.download_documents_for_date(date).await?;
            println!("{}", report.summary());
            println!("📁 Output directory: {}", harvester.output_dir().display());
        }

        Commands::Fetch { doc_id, output, format } => {
            let harvester = build_harvester(config, output, &format)?;

            let path = harvester.download_document(&doc_id).await?;
            println!("✓ Downloaded {} ({}) to {}", doc_id, harvester.format().file_extension(), path.display());
        }

        Commands::Harvest { days, anchor, output, csv, format } => {
            let days = days.unwrap_or(config.duration_days);
            let harvester = build_harvester(config, output, &format)?;

            let report = harvester.harvest(days, anchor).await?;
            if let Some(path) = csv {
                export_listing(&report.listing, &path)?;
            }
            println!("{}", report.summary());
            println!("📁 Output directory: {}", harvester.output_dir().display());
        }
    }

    Ok(())
}

fn build_harvester(
    config: &mut Config,
    output: Option<std::path::PathBuf>,
    format: &str,
) -> Result<Harvester> {
    if let Some(output) = output {
        config.output_dir = output;
    }
    let format: DownloadFormat = Commands::parse_format(format)?;
    config.validate()?;

    Ok(Harvester::from_config(config)?.with_format(format))
}

fn export_listing(listing: &ListResult, path: &std::path::Path) -> Result<()> {
    let rows = edinet::export_csv(listing, path)?;
    info!("Wrote {} rows to {}", rows, path.display());
    Ok(())
}

fn print_listing_summary(days: u32, listing: &ListResult) {
    println!("📅 duration days = {}", days);
    println!("✅ success days = {}", listing.success_count());
    println!("❌ error days = {}", listing.error_count());
    println!("📈 documents listed = {}", listing.record_count());
    for date in listing.error_dates() {
        println!("   failed: {}", date);
    }
}
