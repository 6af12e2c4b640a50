//! Integration tests for [`HttpStatsSource`] against an in-process HTTP
//! server, and for a full poller cycle over real HTTP.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use statwatch_agent::fetcher::{FetchError, HttpStatsSource, StatsSource};
use statwatch_agent::poller::{FailureKind, Poller};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Serve `router` on an ephemeral local port and return the `_stats` URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server error");
    });
    format!("http://{addr}/_stats")
}

/// Answer every request with a `200` that promises 100 bytes, send six,
/// then close the connection.
async fn serve_truncated_body() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            // Drain the request head so closing does not reset the connection.
            let mut request = Vec::new();
            let mut chunk = [0u8; 512];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&chunk[..n]),
                }
            }
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n35,100")
                .await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}/_stats")
}

fn stats_router(body: &'static str) -> Router {
    Router::new().route("/_stats", get(move || async move { body }))
}

// ---------------------------------------------------------------------------
// Test: fetch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn returns_body_on_200() {
    let url = serve(stats_router("10,100,50,100,50,100,50")).await;
    let source = HttpStatsSource::new(url);

    let body = source.fetch().await.expect("fetch should succeed");
    assert_eq!(body, "10,100,50,100,50,100,50");
}

#[tokio::test]
async fn server_error_is_a_status_failure() {
    let router = Router::new().route(
        "/_stats",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let source = HttpStatsSource::new(serve(router).await);

    assert_matches!(
        source.fetch().await,
        Err(FetchError::Status { status: 500 })
    );
}

/// Only exactly 200 counts as success.
#[tokio::test]
async fn other_2xx_is_a_status_failure() {
    let router = Router::new().route("/_stats", get(|| async { StatusCode::NO_CONTENT }));
    let source = HttpStatsSource::new(serve(router).await);

    assert_matches!(
        source.fetch().await,
        Err(FetchError::Status { status: 204 })
    );
}

#[tokio::test]
async fn missing_route_is_a_status_failure() {
    let url = serve(Router::new()).await;
    let source = HttpStatsSource::new(url);

    assert_matches!(
        source.fetch().await,
        Err(FetchError::Status { status: 404 })
    );
}

#[tokio::test]
async fn refused_connection_is_a_request_failure() {
    // Grab a free port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("listener has an address");
    drop(listener);

    let source = HttpStatsSource::new(format!("http://{addr}/_stats"));
    assert_matches!(source.fetch().await, Err(FetchError::Request(_)));
}

#[tokio::test]
async fn invalid_utf8_is_replaced_not_rejected() {
    let router = Router::new().route(
        "/_stats",
        get(|| async { b"35,100,50,100,50,100,\xff".to_vec() }),
    );
    let source = HttpStatsSource::new(serve(router).await);

    let body = source.fetch().await.expect("fetch should succeed");
    assert!(body.ends_with('\u{FFFD}'));
}

/// A body cut short after a good status is a body-read failure, not a
/// transport failure.
#[tokio::test]
async fn truncated_body_is_a_body_failure() {
    let source = HttpStatsSource::new(serve_truncated_body().await);

    assert_matches!(source.fetch().await, Err(FetchError::Body(_)));
}

// ---------------------------------------------------------------------------
// Test: full cycle over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn poller_writes_warnings_from_http_body() {
    let url = serve(stats_router("35,100,90,1000000,950000,125000000,118750000")).await;
    let mut poller = Poller::new(HttpStatsSource::new(url), Vec::new());

    let report = poller.tick().await;
    assert!(report.outcome.is_ok());
    assert_eq!(report.consecutive_failures, 0);

    let output = String::from_utf8(poller.into_output()).expect("output is utf-8");
    assert_eq!(
        output,
        "Load Average is too high: 35\n\
         Memory usage too high: 90%\n\
         Free disk space is too low: 0 Mb left\n\
         Network bandwidth usage high: 50 Mbit/s available\n"
    );
}

#[tokio::test]
async fn unreachable_server_triggers_notice_on_third_tick() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("listener has an address");
    drop(listener);

    let source = HttpStatsSource::new(format!("http://{addr}/_stats"));
    let mut poller = Poller::new(source, Vec::new());

    for expected in [false, false, true] {
        let report = poller.tick().await;
        assert_eq!(report.unreachable, expected);
        assert_eq!(
            report.outcome.expect_err("tick should fail").kind(),
            FailureKind::Transport
        );
    }

    let output = String::from_utf8(poller.into_output()).expect("output is utf-8");
    assert_eq!(output, "Unable to fetch server statistic\n");
}

/// A truncated body aborts the cycle before parsing: no partial warnings,
/// even though the bytes that did arrive start with a high load average.
#[tokio::test]
async fn truncated_body_fails_cycle_without_warnings() {
    let mut poller = Poller::new(HttpStatsSource::new(serve_truncated_body().await), Vec::new());

    let report = poller.tick().await;
    assert!(report.warnings.is_empty());
    assert_eq!(report.consecutive_failures, 1);
    assert_eq!(
        report.outcome.expect_err("tick should fail").kind(),
        FailureKind::BodyRead
    );
    assert!(poller.into_output().is_empty());
}
