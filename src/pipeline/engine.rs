use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{info, warn};

use crate::analytics::AnalyticsSnapshot;
use crate::catalog::{enrich, fetch_mapping, fetch_mapping_range, write_enriched, CatalogSource, EnrichmentSummary, ProductMapping};
use crate::config::AnalyticsConfig;
use crate::ingestion::{LineParser, LoadOutcome, Loader, TextEncoding};
use crate::models::EnrichedTransaction;
use crate::report::{render_report, write_report, ReportData};
use crate::validation::{validate_and_filter, FilterParams, FilterSummary};

/// Everything one analysis pass produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub encoding: TextEncoding,
    pub total_parsed: usize,
    pub parse_failures: usize,
    pub filter_summary: FilterSummary,
    pub snapshot: AnalyticsSnapshot,
    /// Empty when no catalog is attached.
    pub enriched: Vec<EnrichedTransaction>,
    pub enrichment: Option<EnrichmentSummary>
}

/// Drives a sales file through load, validation, analytics and enrichment.
pub struct SalesPipeline<S> {
    config: AnalyticsConfig,
    loader: Loader,
    catalog: Option<S>
}

impl<S: CatalogSource> SalesPipeline<S> {
    /// Creates a pipeline without a catalog; enrichment is skipped until one is attached.
    pub fn new(config: AnalyticsConfig) -> Self {
        let loader = Loader::new(
            LineParser::new(config.thousands_separators.clone()),
            config.encodings.clone()
        );

        Self {
            config,
            loader,
            catalog: None
        }
    }

    pub fn with_catalog(mut self, catalog: S) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadOutcome> {
        let path = path.as_ref();

        self.loader
            .load(path)
            .with_context(|| format!("Could not load sales data from {}", path.display()))
    }

    /// Validates, filters, aggregates and (when a catalog is attached) enriches `load`.
    ///
    /// Never fails: bad records are counted and catalog failures are treated as misses.
    pub async fn analyze(&self, load: &LoadOutcome, params: &FilterParams) -> PipelineOutcome {
        let validation = validate_and_filter(&load.records, params);
        let transactions = &validation.transactions;

        let snapshot = AnalyticsSnapshot::compute(transactions, self.config.top_n, self.config.low_performer_threshold);

        let (enriched, enrichment) = match &self.catalog {
            Some(catalog) => {
                let id_range = self.config.catalog.as_ref().and_then(|settings| settings.id_range.clone());

                let mapping = match id_range {
                    Some(range) => fetch_mapping_range(catalog, range).await,
                    None if transactions.is_empty() => ProductMapping::default(),
                    None => fetch_mapping(catalog, transactions).await
                };

                if mapping.is_empty() && !transactions.is_empty() {
                    warn!("Catalog returned no products; every transaction stays unmatched");
                }

                let enriched = enrich(transactions, &mapping);
                let summary = EnrichmentSummary::from_enriched(&enriched);

                info!("Enriched {} of {} transactions", summary.matched, summary.total);

                (enriched, Some(summary))
            },
            None => (Vec::new(), None)
        };

        PipelineOutcome {
            encoding: load.encoding,
            total_parsed: load.total_parsed,
            parse_failures: load.parse_failures,
            filter_summary: validation.summary,
            snapshot,
            enriched,
            enrichment
        }
    }

    /// Writes the report and, when enrichment ran, the enriched-data file.
    pub fn write_outputs(&self, outcome: &PipelineOutcome) -> Result<()> {
        let report_path = self.config.report_path();
        let report = render_report(&ReportData {
            snapshot: &outcome.snapshot,
            filter_summary: &outcome.filter_summary,
            enrichment: outcome.enrichment.as_ref(),
            top_n: self.config.top_n,
            currency_symbol: &self.config.currency_symbol
        }, Local::now().naive_local());

        write_report(&report_path, &report)
            .with_context(|| format!("Could not write report to {}", report_path.display()))?;

        info!("Report written to {}", report_path.display());

        if let Some(summary) = &outcome.enrichment {
            let enriched_path = self.config.enriched_path();
            let comment = format!("Catalog enrichment: {} of {} transactions matched", summary.matched, summary.total);

            write_enriched(&enriched_path, &outcome.enriched, &comment)
                .with_context(|| format!("Could not write enriched data to {}", enriched_path.display()))?;

            info!("Enriched data written to {}", enriched_path.display());
        }

        Ok(())
    }

    /// Loads `path`, analyses it with `params` and writes every output file.
    pub async fn run(&self, path: impl AsRef<Path>, params: &FilterParams) -> Result<PipelineOutcome> {
        let load = self.load(path)?;
        self.run_loaded(&load, params).await
    }

    /// Analyses an already loaded file and writes every output file.
    pub async fn run_loaded(&self, load: &LoadOutcome, params: &FilterParams) -> Result<PipelineOutcome> {
        let timer = Instant::now();

        let outcome = self.analyze(load, params).await;
        self.write_outputs(&outcome)?;

        info!("Pipeline finished in: {:?} ({})", timer.elapsed(), outcome.filter_summary);

        Ok(outcome)
    }
}
