//! One fetch → parse → evaluate cycle per tick, plus failure tracking.
//!
//! [`Poller`] owns the consecutive-failure counter outright; it is only
//! touched from whichever task drives the poller, so no locking is
//! involved. Warning lines and the unreachable notice are written to the
//! poller's output (stdout in production). Diagnostics go to `tracing`.

use std::io::Write;
use std::time::Duration;

use statwatch_core::{evaluate, MetricsSnapshot, ParseError, Warning};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::fetcher::{FetchError, StatsSource};

/// Consecutive failed cycles after which the source counts as unreachable.
pub const UNREACHABLE_THRESHOLD: u32 = 3;

/// Line written on every tick while the source is unreachable.
pub const UNREACHABLE_MESSAGE: &str = "Unable to fetch server statistic";

/// Why a cycle did not produce a full snapshot.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Coarse classification of a failed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Request failed or the status was not 200.
    Transport,
    /// The body could not be read to the end.
    BodyRead,
    /// The body did not have exactly seven fields.
    Schema,
    /// A field was not a base-10 integer.
    FieldParse,
}

impl CycleError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CycleError::Fetch(FetchError::Request(_) | FetchError::Status { .. }) => {
                FailureKind::Transport
            }
            CycleError::Fetch(FetchError::Body(_)) => FailureKind::BodyRead,
            CycleError::Parse(ParseError::FieldCount { .. }) => FailureKind::Schema,
            CycleError::Parse(ParseError::Field { .. }) => FailureKind::FieldParse,
        }
    }
}

/// What a single tick did.
#[derive(Debug)]
pub struct CycleReport {
    /// Warnings written this tick, in field order.
    pub warnings: Vec<Warning>,
    pub outcome: Result<MetricsSnapshot, CycleError>,
    /// Counter value after this tick.
    pub consecutive_failures: u32,
    /// Whether the unreachable notice was written this tick.
    pub unreachable: bool,
}

/// Drives stats cycles against a [`StatsSource`] and writes results to `W`.
pub struct Poller<S, W> {
    source: S,
    output: W,
    consecutive_failures: u32,
}

impl<S, W> Poller<S, W>
where
    S: StatsSource,
    W: Write + Send,
{
    pub fn new(source: S, output: W) -> Self {
        Self {
            source,
            output,
            consecutive_failures: 0,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run one full cycle and write its output lines.
    ///
    /// Warnings found before a parse failure are still written. The
    /// unreachable check runs after the counter has been updated.
    pub async fn tick(&mut self) -> CycleReport {
        let (warnings, outcome) = match self.source.fetch().await {
            Ok(body) => {
                let evaluation = evaluate(&body);
                (
                    evaluation.warnings,
                    evaluation.result.map_err(CycleError::from),
                )
            }
            Err(e) => (Vec::new(), Err(CycleError::from(e))),
        };

        for warning in &warnings {
            self.emit(&warning.to_string());
        }

        match &outcome {
            Ok(_) => {
                if self.consecutive_failures >= UNREACHABLE_THRESHOLD {
                    tracing::info!(
                        failures = self.consecutive_failures,
                        "Stats source reachable again"
                    );
                }
                self.consecutive_failures = 0;
                tracing::debug!(warnings = warnings.len(), "Stats cycle complete");
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                tracing::debug!(
                    error = %e,
                    kind = ?e.kind(),
                    failures = self.consecutive_failures,
                    "Stats cycle failed",
                );
                if self.consecutive_failures == UNREACHABLE_THRESHOLD {
                    tracing::warn!(
                        failures = self.consecutive_failures,
                        "Stats source unreachable",
                    );
                }
            }
        }

        let unreachable = self.consecutive_failures >= UNREACHABLE_THRESHOLD;
        if unreachable {
            self.emit(UNREACHABLE_MESSAGE);
        }

        CycleReport {
            warnings,
            outcome,
            consecutive_failures: self.consecutive_failures,
            unreachable,
        }
    }

    /// Tick every `period` until `cancel` fires, then hand the poller back.
    ///
    /// The first tick happens one full period after the call. Ticks missed
    /// while a slow cycle runs are skipped, never queued. Cancellation is
    /// only observed between cycles, so an in-flight cycle always
    /// finishes.
    pub async fn run(mut self, period: Duration, cancel: CancellationToken) -> Self {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(interval_ms = period.as_millis() as u64, "Poller started");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Poller stopping");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        self
    }

    fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.output, "{line}") {
            tracing::error!(error = %e, "Failed to write output line");
        }
    }
}
