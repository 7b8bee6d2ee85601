//! Parses the simple transaction CSV format used for imports.
//!
//! The first line is a header and is always skipped. Every other line is
//! `date,description,category,amount,type`. Fields are split on every comma,
//! quoting is not supported.

use crate::transaction::{NewTransaction, parse_amount, parse_date};

/// Parse the lines of a transaction CSV file.
///
/// Lines that do not have five non-empty fields, or whose date, amount or
/// type cannot be parsed, are skipped. Fields after the fifth are ignored.
pub fn parse_transactions_csv(text: &str) -> Vec<NewTransaction> {
    text.split('\n')
        .enumerate()
        .skip(1)
        .filter_map(|(index, line)| {
            let transaction = parse_line(line);

            if transaction.is_none() && !line.trim().is_empty() {
                tracing::debug!("Skipping CSV line {}: {line:?}", index + 1);
            }

            transaction
        })
        .collect()
}

fn parse_line(line: &str) -> Option<NewTransaction> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut fields = line.split(',');

    let (Some(date), Some(description), Some(category), Some(amount), Some(kind)) = (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) else {
        return None;
    };

    if [date, description, category, amount, kind]
        .iter()
        .any(|field| field.is_empty())
    {
        return None;
    }

    Some(NewTransaction {
        kind: kind.parse().ok()?,
        category: category.to_owned(),
        amount: parse_amount(amount)?,
        description: description.to_owned(),
        occurred_on: parse_date(date)?,
    })
}
