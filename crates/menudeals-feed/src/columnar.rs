//! Unmarshaling of the upstream columnar coupon table.
//!
//! The feed ships coupons as
//!
//! ```json
//! { "Columns": ["ID", "Name", ...], "Data": [["P1", "Large Pizza Deal", ...], ...] }
//! ```
//!
//! and each row is zipped against `Columns` by position. Absent or malformed
//! tables mean "no deals" and produce no rows; they are reported to the
//! [`DecodeSink`] rather than raised.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::diagnostics::{DecodeEvent, DecodeSink};

/// One upstream row projected into `column name -> value`.
///
/// Lookups by name are ASCII case-insensitive so `ID` and `Id` both resolve.
/// When two columns share a name, the later column wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFields {
    fields: BTreeMap<String, Value>,
}

impl RowFields {
    /// Raw value of column `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .get(name)
            .or_else(|| {
                self.fields
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
    }

    /// Column `name` rendered as a string. Empty strings, nulls and
    /// non-scalars are treated as absent.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(scalar_text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for RowFields {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Renders a scalar JSON value as display text.
///
/// Strings pass through, numbers and booleans use their JSON spelling.
/// Returns `None` for null, arrays, objects and blank strings.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Locates the coupon table inside a payload object.
///
/// Prefers top-level `Columns`/`Data`; falls back to a nested `Coupons`
/// object carrying the same pair.
fn coupon_table(payload: &Map<String, Value>) -> &Map<String, Value> {
    if payload.contains_key("Columns") {
        return payload;
    }
    match payload.get("Coupons") {
        Some(Value::Object(nested)) if nested.contains_key("Columns") => nested,
        _ => payload,
    }
}

/// Zips every row of the payload's coupon table against its column list.
///
/// Column names that are not strings are kept as their JSON text so the row
/// stays positionally aligned. Rows that are not arrays, or whose length
/// differs from the column count, are skipped.
pub fn unmarshal_rows(payload: &Map<String, Value>, sink: &mut dyn DecodeSink) -> Vec<RowFields> {
    let table = coupon_table(payload);

    let Some(Value::Array(columns)) = table.get("Columns") else {
        sink.record(DecodeEvent::MissingColumns);
        return Vec::new();
    };
    let Some(Value::Array(rows)) = table.get("Data") else {
        sink.record(DecodeEvent::MissingRows);
        return Vec::new();
    };

    let columns: Vec<String> = columns
        .iter()
        .map(|c| match c {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();

    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let Value::Array(values) = row else {
                sink.record(DecodeEvent::NonArrayRow { row: index });
                return None;
            };
            if values.len() != columns.len() {
                sink.record(DecodeEvent::RowLengthMismatch {
                    row: index,
                    expected: columns.len(),
                    actual: values.len(),
                });
                return None;
            }
            Some(
                columns
                    .iter()
                    .cloned()
                    .zip(values.iter().cloned())
                    .collect::<RowFields>(),
            )
        })
        .collect()
}
