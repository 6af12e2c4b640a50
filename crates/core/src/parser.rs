//! Parsing and evaluation of a `_stats` body.
//!
//! Parsing and threshold checks are interleaved: each field is checked as
//! soon as it parses, so a malformed later field does not suppress the
//! warnings of the fields before it.

use crate::error::ParseError;
use crate::fields::{Field, FIELDS, FIELD_COUNT};
use crate::thresholds::{self, Warning};

/// One fully parsed `_stats` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub load_average: i64,
    pub memory_total: i64,
    pub memory_used: i64,
    pub disk_total: i64,
    pub disk_used: i64,
    pub network_total: i64,
    pub network_used: i64,
}

impl MetricsSnapshot {
    fn from_values(values: &[i64; FIELD_COUNT]) -> Self {
        Self {
            load_average: values[Field::LoadAverage.index()],
            memory_total: values[Field::MemoryTotal.index()],
            memory_used: values[Field::MemoryUsed.index()],
            disk_total: values[Field::DiskTotal.index()],
            disk_used: values[Field::DiskUsed.index()],
            network_total: values[Field::NetworkTotal.index()],
            network_used: values[Field::NetworkUsed.index()],
        }
    }

    pub fn memory_ratio(&self) -> f64 {
        thresholds::ratio(self.memory_used, self.memory_total)
    }

    pub fn disk_ratio(&self) -> f64 {
        thresholds::ratio(self.disk_used, self.disk_total)
    }

    pub fn network_ratio(&self) -> f64 {
        thresholds::ratio(self.network_used, self.network_total)
    }
}

/// Result of evaluating one body.
///
/// `warnings` holds every breach found before parsing stopped, so it can
/// be non-empty even when `result` is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub warnings: Vec<Warning>,
    pub result: Result<MetricsSnapshot, ParseError>,
}

/// Parse `body` field by field, checking thresholds along the way.
///
/// The body is split on `,` with no trimming. Anything other than exactly
/// [`FIELD_COUNT`] pieces fails before any field is looked at.
pub fn evaluate(body: &str) -> Evaluation {
    let raw: Vec<&str> = body.split(',').collect();
    if raw.len() != FIELD_COUNT {
        return Evaluation {
            warnings: Vec::new(),
            result: Err(ParseError::FieldCount {
                expected: FIELD_COUNT,
                actual: raw.len(),
            }),
        };
    }

    let mut values = [0i64; FIELD_COUNT];
    let mut warnings = Vec::new();

    for (field, text) in FIELDS.into_iter().zip(raw) {
        values[field.index()] = match text.parse::<i64>() {
            Ok(value) => value,
            Err(source) => {
                return Evaluation {
                    warnings,
                    result: Err(ParseError::Field {
                        field: field.name(),
                        index: field.index(),
                        value: text.to_string(),
                        source,
                    }),
                };
            }
        };

        if let Some(warning) = field.check(&values) {
            warnings.push(warning);
        }
    }

    Evaluation {
        warnings,
        result: Ok(MetricsSnapshot::from_values(&values)),
    }
}
