use std::cmp::Ordering;

use serde_json::Value;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{Date, OffsetDateTime, Time};

/// A typed table cell decoded from a submission record.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Date(OffsetDateTime),
    Other(Value),
}

impl Cell {
    /// Numbers stay numbers, ISO dates and RFC 3339 timestamps become dates,
    /// other strings stay text. Everything else is carried untyped.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(number) => number
                .as_f64()
                .map(Cell::Number)
                .unwrap_or_else(|| Cell::Other(value.clone())),
            Value::String(text) => parse_date(text)
                .map(Cell::Date)
                .unwrap_or_else(|| Cell::Text(text.clone())),
            other => Cell::Other(other.clone()),
        }
    }

    pub fn display(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Number(number) => number.to_string(),
            Cell::Date(date) if date.time() == Time::MIDNIGHT => date.date().to_string(),
            Cell::Date(date) => date.format(&Rfc3339).unwrap_or_else(|_| date.to_string()),
            Cell::Other(Value::Null) => String::new(),
            Cell::Other(Value::String(text)) => text.clone(),
            Cell::Other(other) => other.to_string(),
        }
    }
}

fn parse_date(text: &str) -> Option<OffsetDateTime> {
    if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(timestamp);
    }
    Date::parse(text, &Iso8601::DATE)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Type-dispatched ordering used by column sorts.
///
/// Text compares case-insensitively first and falls back to the raw text,
/// numbers numerically and dates chronologically. Mismatched or untyped
/// pairs compare equal so they keep their relative order.
pub fn compare(left: &Cell, right: &Cell) -> Ordering {
    match (left, right) {
        (Cell::Text(left), Cell::Text(right)) => left
            .to_lowercase()
            .cmp(&right.to_lowercase())
            .then_with(|| left.cmp(right)),
        (Cell::Number(left), Cell::Number(right)) => {
            left.partial_cmp(right).unwrap_or(Ordering::Equal)
        }
        (Cell::Date(left), Cell::Date(right)) => left.cmp(right),
        _ => Ordering::Equal,
    }
}
