//! Startup and shutdown behaviour.

use std::time::Duration;

use http_tap::config::{validate_config, ConfigError, TapConfig};
use http_tap::lifecycle::{self, LifecycleState};
use http_tap::sink::SinkSet;
use http_tap::TapError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

mod common;

#[tokio::test]
async fn test_in_flight_request_drains_before_stop() {
    let dir = tempfile::tempdir().unwrap();
    let body_path = dir.path().join("bodies.out");
    let settings = common::file_settings(&body_path, "\n");
    let server = common::start_server(&settings).await;
    let state_rx = server.subscribe_state();

    let mut stream = common::start_partial_request(server.local_addr(), 10, b"hello").await;
    let in_flight = server.in_flight().clone();
    assert!(common::wait_until(Duration::from_secs(2), || in_flight.active_count() == 1).await);

    let shutdown = tokio::spawn(server.shutdown(Duration::from_secs(5)));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(*state_rx.borrow(), LifecycleState::ShuttingDown);

    stream.write_all(b"world").await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    assert!(response.starts_with(b"HTTP/1.1 200"));

    shutdown.await.unwrap().unwrap();
    assert_eq!(*state_rx.borrow(), LifecycleState::Stopped);
    assert_eq!(std::fs::read(&body_path).unwrap(), b"helloworld\n");
}

#[tokio::test]
async fn test_stalled_request_fails_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let body_path = dir.path().join("bodies.out");
    let settings = common::file_settings(&body_path, "\n");
    let server = common::start_server(&settings).await;
    let state_rx = server.subscribe_state();

    let _stream = common::start_partial_request(server.local_addr(), 100, b"stuck").await;
    let in_flight = server.in_flight().clone();
    assert!(common::wait_until(Duration::from_secs(2), || in_flight.active_count() == 1).await);

    let err = server.shutdown(Duration::from_millis(300)).await.unwrap_err();
    assert!(matches!(err, TapError::ShutdownTimeout(_)));
    assert_ne!(err.exit_code(), 0);
    assert_eq!(*state_rx.borrow(), LifecycleState::Stopped);
}

#[tokio::test]
async fn test_no_new_connections_after_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let settings = common::file_settings(&dir.path().join("bodies.out"), "\n");
    let server = common::start_server(&settings).await;
    let addr = server.local_addr();

    server.shutdown(Duration::from_secs(5)).await.unwrap();

    let res = common::client()
        .post(format!("http://{addr}/"))
        .body("late")
        .timeout(Duration::from_secs(1))
        .send()
        .await;
    assert!(res.is_err());
}

#[tokio::test]
async fn test_run_returns_ok_on_signal() {
    let dir = tempfile::tempdir().unwrap();
    let body_path = dir.path().join("bodies.out");
    let settings = common::file_settings(&body_path, "\n");
    let sinks = SinkSet::open(&settings).unwrap();

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let run = tokio::spawn(async move {
        lifecycle::run(&settings, &sinks, async {
            let _ = rx.await;
        })
        .await
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    tx.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(6), run)
        .await
        .expect("run did not finish")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_port_in_use_is_fatal() {
    let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = occupied.local_addr().unwrap().port();

    let dir = tempfile::tempdir().unwrap();
    let mut settings = common::file_settings(&dir.path().join("bodies.out"), "\n");
    settings.bind_address.set_port(port);
    let sinks = SinkSet::open(&settings).unwrap();

    let err = lifecycle::start(&settings, &sinks).await.err().unwrap();
    assert!(matches!(err, TapError::Bind { .. }));
    assert_ne!(err.exit_code(), 0);
}

#[test]
fn test_invalid_interface_never_binds() {
    let mut config = TapConfig::default();
    config.listener.interface = "not-an-ip".into();
    let err = validate_config(&config).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidInterface(_)));
    assert_ne!(TapError::from(err).exit_code(), 0);
}
