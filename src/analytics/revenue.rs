use crate::analytics::group_in_order;
use crate::models::Transaction;
use crate::types::{percentage_of, round_money, Money};

#[derive(Debug, Clone, PartialEq)]
pub struct RegionSales {
    pub region: String,
    pub total_sales: Money,
    pub transaction_count: usize,
    /// Share of overall revenue, 0-100.
    pub percentage: Money
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionAverage {
    pub region: String,
    pub average_transaction_value: Money
}

#[derive(Default)]
struct RegionAccumulator {
    total: Money,
    count: usize
}

pub fn total_revenue(transactions: &[Transaction]) -> Money {
    transactions.iter().map(Transaction::amount).sum()
}

/// Sales per region, largest first.
pub fn region_wise_sales(transactions: &[Transaction]) -> Vec<RegionSales> {
    let grand_total = total_revenue(transactions);

    let mut regions: Vec<RegionSales> = accumulate_regions(transactions)
        .into_iter()
        .map(|(region, accumulator)| RegionSales {
            region: region.to_string(),
            total_sales: round_money(accumulator.total),
            transaction_count: accumulator.count,
            percentage: percentage_of(accumulator.total, grand_total)
        })
        .collect();

    regions.sort_by(|left, right| right.total_sales.cmp(&left.total_sales));
    regions
}

/// Mean transaction amount per region, largest first.
pub fn average_transaction_value_by_region(transactions: &[Transaction]) -> Vec<RegionAverage> {
    let mut averages: Vec<RegionAverage> = accumulate_regions(transactions)
        .into_iter()
        .map(|(region, accumulator)| RegionAverage {
            region: region.to_string(),
            average_transaction_value: round_money(accumulator.total / Money::from(accumulator.count))
        })
        .collect();

    averages.sort_by(|left, right| right.average_transaction_value.cmp(&left.average_transaction_value));
    averages
}

fn accumulate_regions(transactions: &[Transaction]) -> Vec<(&str, RegionAccumulator)> {
    group_in_order(transactions, Transaction::region, |accumulator: &mut RegionAccumulator, transaction| {
        accumulator.total += transaction.amount();
        accumulator.count += 1;
    })
}
