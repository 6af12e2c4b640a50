use std::num::ParseIntError;

/// Reasons a `_stats` body could not be turned into a full snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Expected {expected} comma-separated fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    #[error("Field {index} ({field}) is not an integer: {value:?}")]
    Field {
        field: &'static str,
        index: usize,
        value: String,
        #[source]
        source: ParseIntError,
    },
}
