mod analytics;
mod catalog;
mod config;
mod ingestion;
mod models;
mod pipeline;
mod prompt;
mod report;
mod types;
mod validation;

use std::io::{stderr, stdin, stdout, BufWriter, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::Result;
use tracing::error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::catalog::{CatalogSource, HttpCatalogClient};
use crate::config::AnalyticsConfig;
use crate::pipeline::{PipelineOutcome, SalesPipeline};
use crate::prompt::prompt_filters;
use crate::validation::{filter_choices, FilterParams};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: sales-analytics [input-file] [log_level:optional]");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: info)");
        return ExitCode::FAILURE;
    }

    let path = &args[1];
    let log_level = args.get(2)
        .map(|s| parse_log_level(s)).unwrap_or(LevelFilter::INFO);

    setup_logging(log_level);

    match run(path, AnalyticsConfig::from_env()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            error!("{failure:#}");
            eprintln!("Error: {failure:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(path: &str, config: AnalyticsConfig) -> Result<()> {
    match config.catalog.clone() {
        Some(catalog_config) => {
            let client = HttpCatalogClient::new(&catalog_config)?;
            execute(SalesPipeline::new(config).with_catalog(client), path).await
        },
        None => execute(SalesPipeline::<HttpCatalogClient>::new(config), path).await
    }
}

async fn execute<S: CatalogSource>(pipeline: SalesPipeline<S>, path: &str) -> Result<()> {
    let outcome = if pipeline.config().interactive && stdin().is_terminal() {
        let load = pipeline.load(path)?;
        let params = prompt_filters(stdin().lock(), stderr(), &filter_choices(&load.records))?;

        pipeline.run_loaded(&load, &params).await?
    } else {
        pipeline.run(path, &FilterParams::default()).await?
    };

    write_summary_to_stdout(&pipeline, &outcome)
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the run summary, so logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_summary_to_stdout<S: CatalogSource>(pipeline: &SalesPipeline<S>, outcome: &PipelineOutcome) -> Result<()> {
    let config = pipeline.config();
    let summary = &outcome.filter_summary;
    let mut output = BufWriter::new(stdout().lock());

    writeln!(output, "encoding={}", outcome.encoding)?;
    writeln!(output, "records_parsed={}", outcome.total_parsed)?;
    writeln!(output, "parse_failures={}", outcome.parse_failures)?;
    writeln!(output, "invalid={}", summary.invalid)?;
    writeln!(output, "filtered_by_region={}", summary.filtered_by_region)?;
    writeln!(output, "filtered_by_amount={}", summary.filtered_by_amount)?;
    writeln!(output, "valid={}", summary.final_count)?;
    writeln!(output, "total_revenue={:.2}", outcome.snapshot.total_revenue)?;

    if let Some(enrichment) = &outcome.enrichment {
        writeln!(output, "enriched={}/{}", enrichment.matched, enrichment.total)?;
        writeln!(output, "enriched_file={}", config.enriched_path().display())?;
    }

    writeln!(output, "report_file={}", config.report_path().display())?;

    output.flush()?;

    Ok(())
}
