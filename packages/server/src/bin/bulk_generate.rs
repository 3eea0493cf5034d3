//! CLI for bulk local page generation from a CSV file
//!
//! Each data row becomes one draft generation, with a pause between calls
//! to stay under the generation API's rate limits.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use site_core::config::Config;
use site_core::domains::local_pages::activities::bulk::{
    parse_bulk_csv, run_bulk_generation, BulkOptions, BulkRowOutcome, BULK_CSV_HEADER, DEFAULT_BULK_STATE,
};
use site_core::kernel::ServerDeps;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bulk_generate")]
#[command(about = "Generate local page drafts from a CSV file")]
#[command(after_help = "CSV columns: primary_keyword_slug,city,zip,county,intent,slug")]
struct Cli {
    /// CSV file; the first line is treated as a header
    csv: PathBuf,

    /// State used for every row
    #[arg(long, default_value = DEFAULT_BULK_STATE)]
    state: String,

    /// Generate even when the row's slug already exists (it will fail with a conflict)
    #[arg(long)]
    no_skip_existing: bool,

    /// Delay between generation calls in milliseconds (defaults to BULK_DELAY_MS)
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,site_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let csv = std::fs::read_to_string(&cli.csv)
        .with_context(|| format!("Failed to read {}", cli.csv.display()))?;
    let rows = parse_bulk_csv(&csv);
    if rows.is_empty() {
        println!("{}", "No data rows found.".yellow());
        println!("Expected header: {}", BULK_CSV_HEADER);
        return Ok(());
    }

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let options = BulkOptions {
        state: cli.state,
        skip_existing: !cli.no_skip_existing,
        delay: cli.delay_ms.map(Duration::from_millis).unwrap_or(config.bulk_delay),
    };
    let deps = ServerDeps::production(&config, pool);

    println!(
        "{}",
        format!("Generating {} local page drafts...", rows.len()).bright_blue().bold()
    );

    let results = run_bulk_generation(&rows, &options, &deps).await;

    let mut failed = 0;
    for result in &results {
        let line = match &result.outcome {
            BulkRowOutcome::Success { slug } => format!("Row {}: Success {}", result.row, slug).green(),
            BulkRowOutcome::Skipped { reason } => format!("Row {}: {}", result.row, reason).yellow(),
            BulkRowOutcome::Error { message } => {
                failed += 1;
                format!("Row {}: Error - {}", result.row, message).red()
            }
        };
        println!("{}", line);
    }

    println!();
    if failed == 0 {
        println!("{}", "Bulk generation complete".bright_green().bold());
    } else {
        println!(
            "{}",
            format!("Bulk generation complete with {} failed rows", failed)
                .bright_red()
                .bold()
        );
    }

    Ok(())
}
