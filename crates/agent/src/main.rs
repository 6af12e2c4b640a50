//! `statwatch-agent` -- host statistics watchdog.
//!
//! Polls the stats endpoint on a fixed interval and prints a line to
//! stdout for every threshold breach, plus `Unable to fetch server
//! statistic` while the endpoint keeps failing. Diagnostics are logged
//! to stderr. Stops cleanly on SIGINT/SIGTERM/SIGHUP/SIGQUIT and exits
//! with status 1 if those handlers cannot be installed.
//!
//! # Environment variables
//!
//! | Variable           | Required | Default                                  | Description            |
//! |--------------------|----------|------------------------------------------|------------------------|
//! | `STATS_URL`        | no       | `http://srv.msk01.gigacorp.local/_stats` | Stats endpoint         |
//! | `POLL_INTERVAL_MS` | no       | `1000`                                   | Milliseconds per poll  |
//! | `RUST_LOG`         | no       | `statwatch_agent=info`                   | Log filter             |

use statwatch_agent::config::AgentConfig;
use statwatch_agent::fetcher::HttpStatsSource;
use statwatch_agent::poller::Poller;
use statwatch_agent::{scheduler, shutdown};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "statwatch_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AgentConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let source = HttpStatsSource::new(config.stats_url);

    tracing::info!(
        url = %source.url(),
        interval_ms = config.poll_interval.as_millis() as u64,
        "Starting statwatch-agent",
    );

    let handle = scheduler::spawn(Poller::new(source, std::io::stdout()), config.poll_interval);

    let (reason, stopped) = scheduler::stop_on(handle, shutdown::shutdown_signal()).await;

    match stopped {
        Ok(poller) => tracing::info!(
            consecutive_failures = poller.consecutive_failures(),
            "Poller stopped",
        ),
        Err(e) => tracing::error!(error = %e, "Poller task ended abnormally"),
    }

    let code = reason.exit_code();
    if code != 0 {
        std::process::exit(code);
    }

    tracing::info!("Shutdown complete");
}
