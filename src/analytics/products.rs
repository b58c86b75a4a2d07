use crate::analytics::group_in_order;
use crate::models::Transaction;
use crate::types::{round_money, Money};

#[derive(Debug, Clone, PartialEq)]
pub struct ProductSales {
    pub product_name: String,
    pub total_quantity: i64,
    pub revenue: Money
}

#[derive(Default)]
struct ProductAccumulator {
    quantity: i64,
    revenue: Money
}

/// The `n` best sellers by quantity. Equal quantities keep first-seen order.
pub fn top_selling_products(transactions: &[Transaction], n: usize) -> Vec<ProductSales> {
    let mut products = product_sales(transactions);
    products.sort_by(|left, right| right.total_quantity.cmp(&left.total_quantity));
    products.truncate(n);
    products
}

/// Products that sold fewer than `threshold` units, slowest first.
pub fn low_performing_products(transactions: &[Transaction], threshold: i64) -> Vec<ProductSales> {
    let mut products: Vec<ProductSales> = product_sales(transactions)
        .into_iter()
        .filter(|product| product.total_quantity < threshold)
        .collect();

    products.sort_by_key(|product| product.total_quantity);
    products
}

fn product_sales(transactions: &[Transaction]) -> Vec<ProductSales> {
    group_in_order(transactions, Transaction::product_name, |accumulator: &mut ProductAccumulator, transaction| {
        accumulator.quantity += transaction.quantity();
        accumulator.revenue += transaction.amount();
    })
    .into_iter()
    .map(|(name, accumulator)| ProductSales {
        product_name: name.to_string(),
        total_quantity: accumulator.quantity,
        revenue: round_money(accumulator.revenue)
    })
    .collect()
}
