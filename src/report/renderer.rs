use std::fs::{create_dir_all, write};
use std::io;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::analytics::AnalyticsSnapshot;
use crate::catalog::EnrichmentSummary;
use crate::types::{format_money, Money};
use crate::validation::FilterSummary;

const RULE_WIDTH: usize = 44;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Everything the report shows. `enrichment` is `None` when the catalog was disabled.
#[derive(Debug, Clone, Copy)]
pub struct ReportData<'a> {
    pub snapshot: &'a AnalyticsSnapshot,
    pub filter_summary: &'a FilterSummary,
    pub enrichment: Option<&'a EnrichmentSummary>,
    pub top_n: usize,
    pub currency_symbol: &'a str
}

impl ReportData<'_> {
    fn money(&self, value: Money) -> String {
        format_money(value, self.currency_symbol)
    }
}

/// Renders the eight report sections, separated by blank lines.
pub fn render_report(data: &ReportData<'_>, generated_at: NaiveDateTime) -> String {
    let mut lines = Vec::new();

    header(&mut lines, data, generated_at);
    overall_summary(&mut lines, data);
    region_performance(&mut lines, data);
    top_products(&mut lines, data);
    top_customers(&mut lines, data);
    daily_trend(&mut lines, data);
    product_performance(&mut lines, data);
    enrichment_summary(&mut lines, data);

    lines.join("\n")
}

/// Writes `text` to `path`, creating parent directories as needed.
pub fn write_report(path: impl AsRef<Path>, text: &str) -> io::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    write(path, text)
}

fn rule(character: char) -> String {
    character.to_string().repeat(RULE_WIDTH)
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push(title.to_string());
    lines.push(rule('-'));
}

fn header(lines: &mut Vec<String>, data: &ReportData<'_>, generated_at: NaiveDateTime) {
    let summary = data.filter_summary;

    lines.push(rule('='));
    lines.push("       SALES ANALYTICS REPORT".to_string());
    lines.push(format!("     Generated: {}", generated_at.format(TIMESTAMP_FORMAT)));
    lines.push(format!("     Records Processed: {}", data.snapshot.transaction_count));
    lines.push(format!(
        "     Input Records: {} (invalid: {}, filtered: {})",
        summary.total_input,
        summary.invalid,
        summary.filtered_by_region + summary.filtered_by_amount
    ));
    lines.push(rule('='));
    lines.push(String::new());
}

fn overall_summary(lines: &mut Vec<String>, data: &ReportData<'_>) {
    let snapshot = data.snapshot;
    let date_range = match &snapshot.date_range {
        Some((first, last)) => format!("{first} to {last}"),
        None => "N/A".to_string()
    };

    section(lines, "OVERALL SUMMARY");
    lines.push(format!("Total Revenue:        {}", data.money(snapshot.total_revenue)));
    lines.push(format!("Total Transactions:   {}", snapshot.transaction_count));
    lines.push(format!("Average Order Value:  {}", data.money(snapshot.average_order_value())));
    lines.push(format!("Date Range:           {date_range}"));
    lines.push(String::new());
}

fn region_performance(lines: &mut Vec<String>, data: &ReportData<'_>) {
    section(lines, "REGION-WISE PERFORMANCE");
    lines.push(format!("{:<8}{:>15}{:>12}{:>8}", "Region", "Sales", "% of Total", "Txns"));

    for region in &data.snapshot.regions {
        lines.push(format!(
            "{:<8}{:>15}{:>12}{:>8}",
            region.region,
            data.money(region.total_sales),
            format!("{:.2}%", region.percentage),
            region.transaction_count
        ));
    }

    lines.push(String::new());
}

fn top_products(lines: &mut Vec<String>, data: &ReportData<'_>) {
    section(lines, &format!("TOP {} PRODUCTS", data.top_n));
    lines.push(format!("{:<6}{:<22}{:>8}{:>15}", "Rank", "Product Name", "Qty", "Revenue"));

    for (rank, product) in data.snapshot.top_products.iter().take(data.top_n).enumerate() {
        lines.push(format!(
            "{:<6}{:<22}{:>8}{:>15}",
            rank + 1,
            product.product_name,
            product.total_quantity,
            data.money(product.revenue)
        ));
    }

    lines.push(String::new());
}

fn top_customers(lines: &mut Vec<String>, data: &ReportData<'_>) {
    section(lines, &format!("TOP {} CUSTOMERS", data.top_n));
    lines.push(format!("{:<6}{:<12}{:>15}{:>8}", "Rank", "Customer", "Total Spent", "Orders"));

    for (rank, customer) in data.snapshot.customers.iter().take(data.top_n).enumerate() {
        lines.push(format!(
            "{:<6}{:<12}{:>15}{:>8}",
            rank + 1,
            customer.customer_id,
            data.money(customer.total_spent),
            customer.purchase_count
        ));
    }

    lines.push(String::new());
}

fn daily_trend(lines: &mut Vec<String>, data: &ReportData<'_>) {
    section(lines, "DAILY SALES TREND");
    lines.push(format!("{:<12}{:>15}{:>8}{:>12}", "Date", "Revenue", "Txns", "Customers"));

    for day in &data.snapshot.daily_trend {
        lines.push(format!(
            "{:<12}{:>15}{:>8}{:>12}",
            day.date,
            data.money(day.revenue),
            day.transaction_count,
            day.unique_customers
        ));
    }

    lines.push(String::new());
}

fn product_performance(lines: &mut Vec<String>, data: &ReportData<'_>) {
    let snapshot = data.snapshot;
    let peak = &snapshot.peak_day;

    section(lines, "PRODUCT PERFORMANCE ANALYSIS");
    lines.push(format!(
        "Best selling day: {} | Revenue: {} | Transactions: {}",
        peak.date,
        data.money(peak.revenue),
        peak.transaction_count
    ));
    lines.push(String::new());

    lines.push(format!("Low performing products (qty < {}):", snapshot.low_performer_threshold));
    if snapshot.low_performers.is_empty() {
        lines.push("  - None".to_string());
    }
    for product in &snapshot.low_performers {
        lines.push(format!(
            "  - {}: qty={}, revenue={}",
            product.product_name,
            product.total_quantity,
            data.money(product.revenue)
        ));
    }
    lines.push(String::new());

    lines.push("Average transaction value per region:".to_string());
    for average in &snapshot.region_averages {
        lines.push(format!("  - {}: {}", average.region, data.money(average.average_transaction_value)));
    }
    lines.push(String::new());
}

fn enrichment_summary(lines: &mut Vec<String>, data: &ReportData<'_>) {
    section(lines, "API ENRICHMENT SUMMARY");

    let Some(enrichment) = data.enrichment else {
        lines.push("Catalog enrichment was disabled for this run.".to_string());
        lines.push(String::new());
        return;
    };

    lines.push(format!("Total transactions enriched: {} / {}", enrichment.matched, enrichment.total));
    lines.push(format!("Success rate: {:.2}%", enrichment.success_rate));
    lines.push("Products that could not be enriched:".to_string());

    if enrichment.unmatched_products.is_empty() {
        lines.push("  - None".to_string());
    }
    for product_id in &enrichment.unmatched_products {
        lines.push(format!("  - {product_id}"));
    }
    lines.push(String::new());
}
