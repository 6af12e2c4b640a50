//! Positional field descriptors for the `_stats` payload.
//!
//! The endpoint sends seven integers in a fixed order. Each [`Field`]
//! knows its position, its name for diagnostics, and which threshold (if
//! any) applies once its value is known. Ratio checks read the matching
//! "total" field, which always precedes its "used" field on the wire.

use crate::thresholds::{self, Warning};

/// Number of comma-separated values in a well-formed payload.
pub const FIELD_COUNT: usize = 7;

/// One value of the `_stats` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    LoadAverage,
    MemoryTotal,
    MemoryUsed,
    DiskTotal,
    DiskUsed,
    NetworkTotal,
    NetworkUsed,
}

/// All fields in wire order.
pub const FIELDS: [Field; FIELD_COUNT] = [
    Field::LoadAverage,
    Field::MemoryTotal,
    Field::MemoryUsed,
    Field::DiskTotal,
    Field::DiskUsed,
    Field::NetworkTotal,
    Field::NetworkUsed,
];

impl Field {
    /// Zero-based position on the wire.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Field::LoadAverage => "load_average",
            Field::MemoryTotal => "memory_total",
            Field::MemoryUsed => "memory_used",
            Field::DiskTotal => "disk_total",
            Field::DiskUsed => "disk_used",
            Field::NetworkTotal => "network_total",
            Field::NetworkUsed => "network_used",
        }
    }

    /// The "total" field this field is divided by, for ratio fields.
    pub const fn denominator(self) -> Option<Field> {
        match self {
            Field::MemoryUsed => Some(Field::MemoryTotal),
            Field::DiskUsed => Some(Field::DiskTotal),
            Field::NetworkUsed => Some(Field::NetworkTotal),
            _ => None,
        }
    }

    /// Run this field's threshold check against the values parsed so far.
    ///
    /// `seen` must already hold this field's value and every value before
    /// it. Totals carry no check of their own.
    pub fn check(self, seen: &[i64; FIELD_COUNT]) -> Option<Warning> {
        let value = seen[self.index()];
        let total = self.denominator().map(|d| seen[d.index()]);

        match (self, total) {
            (Field::LoadAverage, _) => thresholds::check_load_average(value),
            (Field::MemoryUsed, Some(total)) => thresholds::check_memory(total, value),
            (Field::DiskUsed, Some(total)) => thresholds::check_disk(total, value),
            (Field::NetworkUsed, Some(total)) => thresholds::check_network(total, value),
            _ => None,
        }
    }
}
