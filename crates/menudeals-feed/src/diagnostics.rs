//! Collectors for the soft failures the decode pipeline tolerates.
//!
//! The pipeline never logs through global state; callers hand it a
//! [`DecodeSink`] and decide what to do with the events.

/// A tolerated anomaly found while decoding a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    /// The payload has no `Columns` array.
    MissingColumns,
    /// The payload has `Columns` but no `Data` array.
    MissingRows,
    /// Row `row` (0-based) is not an array and was skipped.
    NonArrayRow { row: usize },
    /// Row `row` (0-based) had `actual` values for `expected` columns and was skipped.
    RowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl std::fmt::Display for DecodeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeEvent::MissingColumns => write!(f, "payload has no Columns array"),
            DecodeEvent::MissingRows => write!(f, "payload has no Data array"),
            DecodeEvent::NonArrayRow { row } => write!(f, "row {row} is not an array"),
            DecodeEvent::RowLengthMismatch {
                row,
                expected,
                actual,
            } => write!(f, "row {row} has {actual} values for {expected} columns"),
        }
    }
}

pub trait DecodeSink {
    fn record(&mut self, event: DecodeEvent);
}

/// Emits each event through `tracing`.
///
/// A missing table is routine (a store with no deals) and logs at `debug`;
/// skipped rows log at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DecodeSink for TracingSink {
    fn record(&mut self, event: DecodeEvent) {
        match event {
            DecodeEvent::MissingColumns | DecodeEvent::MissingRows => {
                tracing::debug!(event = %event, "coupon table absent; decoding no coupons");
            }
            DecodeEvent::NonArrayRow { row } => {
                tracing::warn!(row, "skipping coupon row that is not an array");
            }
            DecodeEvent::RowLengthMismatch {
                row,
                expected,
                actual,
            } => {
                tracing::warn!(row, expected, actual, "skipping misaligned coupon row");
            }
        }
    }
}

/// Stores events in order for later inspection.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub events: Vec<DecodeEvent>,
}

impl DecodeSink for CollectingSink {
    fn record(&mut self, event: DecodeEvent) {
        self.events.push(event);
    }
}
