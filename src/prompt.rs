//! Interactive filter selection.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::types::{parse_money, Money};
use crate::validation::{FilterChoices, FilterParams};

/// Shows the available filter values and reads a region and amount bounds from `input`.
///
/// A blank answer (or end of input) leaves that filter unset. An amount that does not parse
/// is reported on `output` and also left unset.
pub fn prompt_filters(mut input: impl BufRead, mut output: impl Write, choices: &FilterChoices) -> io::Result<FilterParams> {
    if choices.regions.is_empty() {
        writeln!(output, "Available regions: none")?;
    } else {
        writeln!(output, "Available regions: {}", choices.regions.join(", "))?;
    }

    if let Some((min, max)) = choices.amount_range {
        writeln!(output, "Transaction amount range: {min:.2} - {max:.2}")?;
    }

    let region = ask(&mut input, &mut output, "Filter by region (blank for all): ")?;

    if let Some(region) = &region
        && !choices.regions.contains(region)
    {
        writeln!(output, "Region [{region}] does not appear in the data; no transactions will match")?;
    }

    let min_amount = ask_amount(&mut input, &mut output, "Minimum amount (blank for none): ")?;
    let max_amount = ask_amount(&mut input, &mut output, "Maximum amount (blank for none): ")?;

    Ok(FilterParams {
        region,
        min_amount,
        max_amount
    })
}

fn ask(input: &mut impl BufRead, output: &mut impl Write, question: &str) -> io::Result<Option<String>> {
    write!(output, "{question}")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

fn ask_amount(input: &mut impl BufRead, output: &mut impl Write, question: &str) -> io::Result<Option<Money>> {
    let Some(answer) = ask(input, output, question)? else {
        return Ok(None);
    };

    match parse_money(&answer.replace(',', "")) {
        Ok(amount) => Ok(Some(amount)),
        Err(error) => {
            warn!("Ignoring amount filter: {error}");
            writeln!(output, "Could not read [{answer}] as an amount; no limit applied")?;
            Ok(None)
        }
    }
}
