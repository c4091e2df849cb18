use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use depthframe::{
    config::Config,
    database::{Database, repositories::{FrameSeaOrmRepository, FrameStore}},
    ingestor::{CsvScanlineReader, IngestionPipeline, inspect_csv},
    models::RangeQuery,
    processing::Transform,
    services::{FrameService, frame_cache::CacheCoordinator},
    utils::human_format::{format_bytes, format_seconds},
};

#[derive(Parser)]
#[command(name = "depthframe")]
#[command(version)]
#[command(about = "Depth-indexed scanline colorization: CSV ingestion and cached frame queries")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "depthframe.toml")]
    config: String,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a CSV of depth-indexed scanlines into the frame store
    Ingest {
        /// CSV source path (defaults to the configured ingestion.csv_path)
        csv: Option<PathBuf>,

        /// Rows processed per chunk (overrides the configured value)
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Delete every stored frame before ingesting
        #[arg(long)]
        clear: bool,
    },
    /// Print a structural summary of a CSV source without ingesting it
    Inspect {
        /// CSV source path
        csv: PathBuf,
    },
    /// Query stored frames by depth range
    Query {
        /// Inclusive lower depth bound
        #[arg(long)]
        min: Option<f64>,

        /// Inclusive upper depth bound
        #[arg(long)]
        max: Option<f64>,

        /// Page size
        #[arg(long, default_value_t = RangeQuery::DEFAULT_LIMIT)]
        limit: u64,

        /// Rows to skip before the page starts
        #[arg(long, default_value_t = 0)]
        offset: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("depthframe={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting depthframe v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    match cli.command {
        Command::Inspect { csv } => {
            // No database needed for a structural probe.
            let summary = inspect_csv(&csv)
                .with_context(|| format!("Failed to inspect '{}'", csv.display()))?;
            println!("Source:            {}", summary.path);
            println!("Rows:              {}", summary.total_rows);
            println!(
                "Columns:           {} (depth + {} samples)",
                summary.column_count, summary.sample_columns
            );
            println!("First depths:      {:?}", summary.sample_depths);
            println!("File size:         {}", format_bytes(summary.file_size_bytes));
            println!(
                "Est. decoded size: {}",
                format_bytes(summary.estimated_memory_bytes)
            );
            return Ok(());
        }
        Command::Ingest { csv, chunk_size, clear } => {
            let (store, cache) = connect(&config).await?;
            let csv_path = csv.unwrap_or_else(|| config.ingestion.csv_path.clone());
            let chunk_size = chunk_size.unwrap_or(config.ingestion.chunk_size);

            let transform =
                Transform::new(config.ingestion.source_width, config.ingestion.target_width)?;
            let pipeline = IngestionPipeline::new(store, transform, cache, chunk_size);

            let reader = CsvScanlineReader::open(&csv_path, config.ingestion.source_width)
                .with_context(|| format!("Failed to open '{}'", csv_path.display()))?;
            let report = pipeline.run(reader, clear).await?;

            println!("Status:         {}", report.status);
            println!("Rows read:      {}", report.rows_read);
            println!("Rows failed:    {}", report.rows_failed);
            println!("Frames written: {}", report.frames_written);
            println!(
                "Duration:       {} ({:.0} rows/s)",
                format_seconds(report.duration_seconds),
                report.rows_per_second()
            );
        }
        Command::Query { min, max, limit, offset } => {
            let (store, cache) = connect(&config).await?;
            let service = FrameService::new(store, cache);

            let query = RangeQuery::bounded(min, max, limit, offset);
            let result = service.frames_in_range(query).await?;

            println!("Frames: {} (has_more: {})", result.frames.len(), result.has_more);
            for frame in &result.frames {
                println!(
                    "  depth {:>10}  {}x{}  {}",
                    frame.depth.to_string(),
                    frame.width,
                    frame.height,
                    format_bytes(frame.pixels.len() as u64)
                );
            }
        }
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<(Arc<dyn FrameStore>, Arc<CacheCoordinator>)> {
    let database = Database::new(&config.database).await?;
    database.migrate().await?;
    let store: Arc<dyn FrameStore> = Arc::new(FrameSeaOrmRepository::new(database.connection()));
    let cache = Arc::new(CacheCoordinator::new(&config.cache));
    Ok((store, cache))
}
