//! Background polling task and its stop handshake.
//!
//! [`spawn`] moves a [`Poller`] onto its own task. Stopping is two steps:
//! the [`CancellationToken`] is the stop request and awaiting the task's
//! [`JoinHandle`] is the acknowledgment. The caller blocks on the second
//! step until the in-flight cycle, if any, has finished.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::fetcher::StatsSource;
use crate::poller::Poller;

/// Handle to a running poller task.
pub struct PollerHandle<S, W> {
    cancel: CancellationToken,
    task: JoinHandle<Poller<S, W>>,
}

/// Start ticking `poller` every `period` on a new task.
pub fn spawn<S, W>(poller: Poller<S, W>, period: Duration) -> PollerHandle<S, W>
where
    S: StatsSource + 'static,
    W: Write + Send + 'static,
{
    let cancel = CancellationToken::new();
    let task = tokio::spawn(poller.run(period, cancel.clone()));
    PollerHandle { cancel, task }
}

impl<S, W> PollerHandle<S, W> {
    /// Request a stop and wait for the task to acknowledge it.
    ///
    /// Returns the poller so its final state can be inspected.
    pub async fn shutdown(self) -> Result<Poller<S, W>, JoinError> {
        self.cancel.cancel();
        self.task.await
    }
}

/// Why the agent stopped polling.
#[derive(Debug)]
pub enum StopReason {
    /// A termination signal arrived; a normal, graceful stop.
    Signal(&'static str),
    /// Signal handlers could not be installed, so the agent cannot be
    /// stopped cleanly and must not keep running unattended.
    SignalHandler(std::io::Error),
}

impl StopReason {
    /// Process exit status for this stop.
    pub fn exit_code(&self) -> i32 {
        match self {
            StopReason::Signal(_) => 0,
            StopReason::SignalHandler(_) => 1,
        }
    }
}

/// Wait for `signal`, then run the stop handshake on `handle`.
///
/// The poller is stopped on both paths; only the reason differs.
pub async fn stop_on<S, W, F>(
    handle: PollerHandle<S, W>,
    signal: F,
) -> (StopReason, Result<Poller<S, W>, JoinError>)
where
    F: Future<Output = std::io::Result<&'static str>>,
{
    let reason = match signal.await {
        Ok(name) => {
            tracing::info!(signal = name, "Received signal, stopping poller");
            StopReason::Signal(name)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install signal handlers, stopping poller");
            StopReason::SignalHandler(e)
        }
    };

    (reason, handle.shutdown().await)
}
