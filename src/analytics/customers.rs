use std::collections::BTreeSet;

use crate::analytics::group_in_order;
use crate::models::Transaction;
use crate::types::{round_money, Money};

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerSummary {
    pub customer_id: String,
    pub total_spent: Money,
    pub purchase_count: usize,
    pub avg_order_value: Money,
    /// Distinct product names, sorted.
    pub products_bought: Vec<String>
}

#[derive(Default)]
struct CustomerAccumulator<'a> {
    spent: Money,
    purchases: usize,
    products: BTreeSet<&'a str>
}

/// Per-customer spending, biggest spender first.
pub fn customer_analysis(transactions: &[Transaction]) -> Vec<CustomerSummary> {
    let mut customers: Vec<CustomerSummary> = group_in_order::<CustomerAccumulator<'_>, _, _>(
        transactions,
        Transaction::customer_id,
        |accumulator, transaction| {
            accumulator.spent += transaction.amount();
            accumulator.purchases += 1;
            accumulator.products.insert(transaction.product_name());
        }
    )
    .into_iter()
    .map(|(customer_id, accumulator)| CustomerSummary {
        customer_id: customer_id.to_string(),
        total_spent: round_money(accumulator.spent),
        purchase_count: accumulator.purchases,
        avg_order_value: round_money(accumulator.spent / Money::from(accumulator.purchases)),
        products_bought: accumulator.products.into_iter().map(str::to_string).collect()
    })
    .collect();

    customers.sort_by(|left, right| right.total_spent.cmp(&left.total_spent));
    customers
}
