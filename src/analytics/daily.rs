use std::collections::{BTreeMap, HashSet};

use crate::models::Transaction;
use crate::types::{round_money, Money};

#[derive(Debug, Clone, PartialEq)]
pub struct DailySales {
    pub date: String,
    pub revenue: Money,
    pub transaction_count: usize,
    pub unique_customers: usize
}

/// Best day by revenue. Empty input yields an empty date with zero revenue and count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PeakDay {
    pub date: String,
    pub revenue: Money,
    pub transaction_count: usize
}

#[derive(Default)]
struct DayAccumulator<'a> {
    revenue: Money,
    count: usize,
    customers: HashSet<&'a str>
}

/// Revenue per day in ascending date order.
pub fn daily_sales_trend(transactions: &[Transaction]) -> Vec<DailySales> {
    let days = transactions.iter().fold(BTreeMap::<&str, DayAccumulator>::new(), |mut days, transaction| {
        let day = days.entry(transaction.date()).or_default();
        day.revenue += transaction.amount();
        day.count += 1;
        day.customers.insert(transaction.customer_id());
        days
    });

    days.into_iter()
        .map(|(date, day)| DailySales {
            date: date.to_string(),
            revenue: round_money(day.revenue),
            transaction_count: day.count,
            unique_customers: day.customers.len()
        })
        .collect()
}

/// The day with the highest revenue; on ties the earliest date wins.
pub fn find_peak_sales_day(transactions: &[Transaction]) -> PeakDay {
    daily_sales_trend(transactions)
        .into_iter()
        .fold(None::<DailySales>, |best, day| match best {
            Some(best) if best.revenue >= day.revenue => Some(best),
            _ => Some(day)
        })
        .map(|day| PeakDay {
            date: day.date,
            revenue: day.revenue,
            transaction_count: day.transaction_count
        })
        .unwrap_or_default()
}

/// Earliest and latest transaction dates.
pub fn date_range(transactions: &[Transaction]) -> Option<(String, String)> {
    let first = transactions.iter().map(Transaction::date).min()?;
    let last = transactions.iter().map(Transaction::date).max()?;

    Some((first.to_string(), last.to_string()))
}
