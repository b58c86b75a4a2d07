//! Read-only analytics over validated transactions.
//!
//! Every view is a pure function of `&[Transaction]`: it folds the input into a local
//! accumulator and returns a freshly built, ordered result.

mod customers;
mod daily;
mod products;
mod revenue;

use std::collections::HashMap;

use crate::models::Transaction;
use crate::types::Money;

pub use customers::{customer_analysis, CustomerSummary};
pub use daily::{daily_sales_trend, date_range, find_peak_sales_day, DailySales, PeakDay};
pub use products::{low_performing_products, top_selling_products, ProductSales};
pub use revenue::{average_transaction_value_by_region, region_wise_sales, total_revenue, RegionAverage, RegionSales};

/// All views computed over one set of transactions.
#[derive(Debug, Clone)]
pub struct AnalyticsSnapshot {
    pub transaction_count: usize,
    pub total_revenue: Money,
    pub date_range: Option<(String, String)>,
    pub regions: Vec<RegionSales>,
    pub region_averages: Vec<RegionAverage>,
    pub top_products: Vec<ProductSales>,
    pub customers: Vec<CustomerSummary>,
    pub daily_trend: Vec<DailySales>,
    pub peak_day: PeakDay,
    pub low_performers: Vec<ProductSales>,
    pub low_performer_threshold: i64
}

impl AnalyticsSnapshot {
    pub fn compute(transactions: &[Transaction], top_n: usize, low_performer_threshold: i64) -> Self {
        Self {
            transaction_count: transactions.len(),
            total_revenue: total_revenue(transactions),
            date_range: date_range(transactions),
            regions: region_wise_sales(transactions),
            region_averages: average_transaction_value_by_region(transactions),
            top_products: top_selling_products(transactions, top_n),
            customers: customer_analysis(transactions),
            daily_trend: daily_sales_trend(transactions),
            peak_day: find_peak_sales_day(transactions),
            low_performers: low_performing_products(transactions, low_performer_threshold),
            low_performer_threshold
        }
    }

    /// Mean amount per transaction, zero when there are none.
    pub fn average_order_value(&self) -> Money {
        if self.transaction_count == 0 {
            return Money::ZERO;
        }

        self.total_revenue / Money::from(self.transaction_count)
    }
}

/// Groups transactions by `key`, folding each into an accumulator.
///
/// Groups are returned in order of first occurrence, which is what makes the later
/// stable sorts break ties by insertion order.
fn group_in_order<'a, A, K, F>(transactions: &'a [Transaction], key: K, mut fold: F) -> Vec<(&'a str, A)>
where
    A: Default,
    K: Fn(&'a Transaction) -> &'a str,
    F: FnMut(&mut A, &'a Transaction)
{
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, A)> = Vec::new();

    for transaction in transactions {
        let name = key(transaction);
        let position = *positions.entry(name).or_insert_with(|| {
            groups.push((name, A::default()));
            groups.len() - 1
        });

        fold(&mut groups[position].1, transaction);
    }

    groups
}
