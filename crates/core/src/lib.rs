//! `statwatch-core` -- pure parsing and threshold logic for host statistics.
//!
//! The remote `_stats` endpoint reports seven comma-separated integers.
//! This crate turns that payload into a [`MetricsSnapshot`] and the
//! [`Warning`]s it triggers. No I/O happens here; the agent crate owns
//! fetching, scheduling and output.

pub mod error;
pub mod fields;
pub mod parser;
pub mod thresholds;

pub use error::ParseError;
pub use fields::{Field, FIELDS, FIELD_COUNT};
pub use parser::{evaluate, Evaluation, MetricsSnapshot};
pub use thresholds::Warning;
