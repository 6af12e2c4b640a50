//! Process signal handling.

/// Wait for a termination signal and return its name.
///
/// Handles Ctrl-C everywhere and, on Unix, SIGTERM, SIGHUP and SIGQUIT as
/// well, so the agent stops cleanly whether it was interrupted from a
/// terminal or stopped by a process manager. All handlers are installed
/// before waiting; a failure to install one is returned immediately.
pub async fn shutdown_signal() -> std::io::Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        let mut hangup = signal(SignalKind::hangup())?;
        let mut quit = signal(SignalKind::quit())?;

        tokio::select! {
            result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
            _ = terminate.recv() => Ok("SIGTERM"),
            _ = hangup.recv() => Ok("SIGHUP"),
            _ = quit.recv() => Ok("SIGQUIT"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok("Ctrl-C")
    }
}
