use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use tracing::{debug, info};

use crate::models::{ParsedRecord, Transaction};
use crate::types::Money;

/// Optional narrowing applied after structural validation. `None` means "no filter on this axis".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    pub region: Option<String>,
    pub min_amount: Option<Money>,
    pub max_amount: Option<Money>
}

/// Stage counters; `final_count + invalid + filtered_by_region + filtered_by_amount == total_input`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub total_input: usize,
    pub invalid: usize,
    pub filtered_by_region: usize,
    pub filtered_by_amount: usize,
    pub final_count: usize
}

impl Display for FilterSummary {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "total_input={}, invalid={}, filtered_by_region={}, filtered_by_amount={}, final_count={}",
            self.total_input, self.invalid, self.filtered_by_region, self.filtered_by_amount, self.final_count
        )
    }
}

/// What a caller can offer as filter values, observed over structurally valid records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChoices {
    pub regions: Vec<String>,
    pub amount_range: Option<(Money, Money)>
}

#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub transactions: Vec<Transaction>,
    pub summary: FilterSummary
}

/// Validates each record, then applies the region and amount filters in that order.
///
/// Invalid records are dropped and counted, never returned as errors. Surviving
/// transactions keep their input order.
pub fn validate_and_filter(records: &[ParsedRecord], params: &FilterParams) -> ValidationOutcome {
    let total_input = records.len();
    let valid = validate(records);
    let invalid = total_input - valid.len();

    let before_region = valid.len();
    let by_region: Vec<Transaction> = match &params.region {
        Some(region) => valid.into_iter().filter(|transaction| transaction.region() == region.as_str()).collect(),
        None => valid
    };
    let filtered_by_region = before_region - by_region.len();

    let before_amount = by_region.len();
    let transactions: Vec<Transaction> = by_region
        .into_iter()
        .filter(|transaction| params.min_amount.is_none_or(|min| transaction.amount() >= min))
        .filter(|transaction| params.max_amount.is_none_or(|max| transaction.amount() <= max))
        .collect();
    let filtered_by_amount = before_amount - transactions.len();

    let summary = FilterSummary {
        total_input,
        invalid,
        filtered_by_region,
        filtered_by_amount,
        final_count: transactions.len()
    };

    info!("Validation complete: {summary}");

    ValidationOutcome {
        transactions,
        summary
    }
}

/// Regions and amount range over the structurally valid records, without filtering.
pub fn filter_choices(records: &[ParsedRecord]) -> FilterChoices {
    choices_for(&validate(records))
}

fn validate(records: &[ParsedRecord]) -> Vec<Transaction> {
    records
        .iter()
        .cloned()
        .filter_map(|record| match Transaction::try_from(record) {
            Ok(transaction) => Some(transaction),
            Err(error) => {
                debug!("Record rejected: {error}");
                None
            }
        })
        .collect()
}

fn choices_for(transactions: &[Transaction]) -> FilterChoices {
    let regions: BTreeSet<&str> = transactions.iter().map(Transaction::region).collect();

    let amount_range = transactions.iter().map(Transaction::amount).fold(None, |range, amount| match range {
        None => Some((amount, amount)),
        Some((min, max)) => Some((min.min(amount), max.max(amount)))
    });

    FilterChoices {
        regions: regions.into_iter().map(str::to_string).collect(),
        amount_range
    }
}
