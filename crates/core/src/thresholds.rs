//! Fixed utilisation thresholds and the warnings they produce.
//!
//! Every comparison is strict: a value exactly at its limit is fine.
//! Ratios are plain IEEE divisions, so a zero total yields `inf` or
//! `NaN` and compares accordingly.

use std::fmt;

/// Highest load average that does not warn.
pub const LOAD_AVERAGE_LIMIT: i64 = 30;

/// Highest memory used/total ratio that does not warn.
pub const MEMORY_USAGE_LIMIT: f64 = 0.8;

/// Highest disk used/total ratio that does not warn.
pub const DISK_USAGE_LIMIT: f64 = 0.9;

/// Highest network used/total ratio that does not warn.
pub const NETWORK_USAGE_LIMIT: f64 = 0.9;

/// Disk quantities are reported in bytes; free space is shown in megabytes.
const BYTES_PER_MB: i64 = 1_000_000;

/// Bandwidth is reported in bytes/s; availability is shown in Mbit/s.
const BYTES_PER_SEC_PER_MBIT: i64 = 125_000;

/// A single threshold breach, rendered as one output line via `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    LoadAverage { value: i64 },
    MemoryUsage { percent: i64 },
    DiskSpace { free_mb: i64 },
    NetworkBandwidth { available_mbit: i64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::LoadAverage { value } => write!(f, "Load Average is too high: {value}"),
            Warning::MemoryUsage { percent } => write!(f, "Memory usage too high: {percent}%"),
            Warning::DiskSpace { free_mb } => {
                write!(f, "Free disk space is too low: {free_mb} Mb left")
            }
            Warning::NetworkBandwidth { available_mbit } => write!(
                f,
                "Network bandwidth usage high: {available_mbit} Mbit/s available"
            ),
        }
    }
}

/// `used / total` as a float. No guard against a zero total.
pub fn ratio(used: i64, total: i64) -> f64 {
    used as f64 / total as f64
}

/// Whole percent, truncated toward zero. Non-finite ratios saturate.
pub fn percent(ratio: f64) -> i64 {
    (ratio * 100.0) as i64
}

/// Remaining disk in whole megabytes, truncated toward zero.
pub fn disk_free_mb(total: i64, used: i64) -> i64 {
    total.wrapping_sub(used) / BYTES_PER_MB
}

/// Remaining bandwidth in whole Mbit/s, truncated toward zero.
pub fn network_available_mbit(total: i64, used: i64) -> i64 {
    total.wrapping_sub(used) / BYTES_PER_SEC_PER_MBIT
}

pub fn check_load_average(value: i64) -> Option<Warning> {
    (value > LOAD_AVERAGE_LIMIT).then_some(Warning::LoadAverage { value })
}

pub fn check_memory(total: i64, used: i64) -> Option<Warning> {
    let usage = ratio(used, total);
    (usage > MEMORY_USAGE_LIMIT).then(|| Warning::MemoryUsage {
        percent: percent(usage),
    })
}

pub fn check_disk(total: i64, used: i64) -> Option<Warning> {
    (ratio(used, total) > DISK_USAGE_LIMIT).then(|| Warning::DiskSpace {
        free_mb: disk_free_mb(total, used),
    })
}

pub fn check_network(total: i64, used: i64) -> Option<Warning> {
    (ratio(used, total) > NETWORK_USAGE_LIMIT).then(|| Warning::NetworkBandwidth {
        available_mbit: network_available_mbit(total, used),
    })
}
