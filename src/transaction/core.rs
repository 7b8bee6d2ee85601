//! Defines the core data models for transactions and the parsing of
//! user-entered transaction fields.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{
    Date, OffsetDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{Error, OwnerId, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction is money earned or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionKind {
    /// The lowercase name used in JSON, CSV and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    /// Parses "income" or "expense", ignoring ASCII case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("income") {
            Ok(TransactionKind::Income)
        } else if s.eq_ignore_ascii_case("expense") {
            Ok(TransactionKind::Expense)
        } else {
            Err(Error::InvalidField("type"))
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are created by a [TransactionStore](super::TransactionStore)
/// from a [NewTransaction], which assigns the ID, owner and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user the transaction belongs to.
    pub owner: OwnerId,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type", alias = "kind")]
    pub kind: TransactionKind,
    /// A free-text label used to group transactions, e.g. "Food".
    pub category: String,
    /// The amount of money spent or earned in this transaction.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    #[serde(rename = "date", alias = "occurredOn")]
    pub occurred_on: Date,
    /// When the transaction was first stored.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The fields needed to store a new transaction.
///
/// The owner is deliberately absent, it always comes from the authenticated
/// caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// A free-text label used to group transactions.
    pub category: String,
    /// The amount of money spent or earned.
    pub amount: Decimal,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub occurred_on: Date,
}

/// The fields to replace on an existing transaction, `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUpdate {
    /// The new kind.
    pub kind: Option<TransactionKind>,
    /// The new category.
    pub category: Option<String>,
    /// The new amount.
    pub amount: Option<Decimal>,
    /// The new description.
    pub description: Option<String>,
    /// The new date.
    pub occurred_on: Option<Date>,
}

impl TransactionUpdate {
    /// Whether the update would not change any field.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// ============================================================================
// REQUEST BODIES
// ============================================================================

/// The JSON body for creating or updating a transaction, as entered by a user.
///
/// All fields are kept as loosely typed as the client sends them and are
/// validated by [TransactionForm::into_new_transaction] and
/// [TransactionForm::into_update]. Any other fields in the body, such as
/// `owner` or `id`, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    /// "income" or "expense".
    #[serde(
        rename = "type",
        alias = "kind",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    /// The category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// The amount as a JSON number or a numeric string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
    /// The description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The date as `YYYY-MM-DD` or an RFC 3339 date-time.
    #[serde(
        rename = "date",
        alias = "occurredOn",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
}

impl TransactionForm {
    /// Validate the form for creating a transaction.
    ///
    /// # Errors
    /// Returns [Error::MissingFields] if any field is missing or empty, or
    /// [Error::InvalidField] if a field cannot be parsed.
    pub fn into_new_transaction(self) -> Result<NewTransaction, Error> {
        let (Some(kind), Some(category), Some(amount), Some(description), Some(date)) = (
            non_empty(self.kind),
            non_empty(self.category),
            non_null(self.amount),
            non_empty(self.description),
            non_empty(self.date),
        ) else {
            return Err(Error::MissingFields);
        };

        Ok(NewTransaction {
            kind: kind.parse()?,
            category,
            amount: parse_amount_value(&amount)?,
            description,
            occurred_on: parse_date(&date).ok_or(Error::InvalidField("date"))?,
        })
    }

    /// Validate the form for updating a transaction.
    ///
    /// Missing or empty fields are left unchanged by the update.
    ///
    /// # Errors
    /// Returns [Error::InvalidField] if a field is present but cannot be parsed.
    pub fn into_update(self) -> Result<TransactionUpdate, Error> {
        Ok(TransactionUpdate {
            kind: non_empty(self.kind).map(|kind| kind.parse()).transpose()?,
            category: non_empty(self.category),
            amount: non_null(self.amount)
                .map(|amount| parse_amount_value(&amount))
                .transpose()?,
            description: non_empty(self.description),
            occurred_on: non_empty(self.date)
                .map(|date| parse_date(&date).ok_or(Error::InvalidField("date")))
                .transpose()?,
        })
    }
}

impl From<&Transaction> for TransactionForm {
    fn from(transaction: &Transaction) -> Self {
        Self {
            kind: Some(transaction.kind.to_string()),
            category: Some(transaction.category.clone()),
            amount: Some(Value::String(transaction.amount.to_string())),
            description: Some(transaction.description.clone()),
            date: Some(transaction.occurred_on.to_string()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn non_null(value: Option<Value>) -> Option<Value> {
    value.filter(|value| match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        _ => true,
    })
}

fn parse_amount_value(value: &Value) -> Result<Decimal, Error> {
    let amount = match value {
        Value::Number(number) => parse_amount(&number.to_string()),
        Value::String(text) => parse_amount(text),
        _ => None,
    };

    amount.ok_or(Error::InvalidField("amount"))
}

// ============================================================================
// PARSING
// ============================================================================

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a user-entered amount, e.g. "12.30", "-5" or "1e3".
///
/// Returns `None` if `text` is not a number.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let text = text.trim();

    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Parse a user-entered date.
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 date-time such as
/// `2025-01-10T00:00:00.000Z`, in which case the date part is used.
/// Returns `None` if `text` is neither.
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();

    Date::parse(text, DATE_FORMAT).ok().or_else(|| {
        OffsetDateTime::parse(text, &Rfc3339)
            .ok()
            .map(|date_time| date_time.date())
    })
}
