mod filter;

pub use filter::{filter_choices, validate_and_filter, FilterChoices, FilterParams, FilterSummary};
