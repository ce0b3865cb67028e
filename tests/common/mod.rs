//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use http_tap::config::{validate_config, Settings, TapConfig};
use http_tap::lifecycle::{self, RunningServer};
use http_tap::sink::SinkSet;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Settings for a server on an ephemeral loopback port writing bodies to
/// `body` and logs to stderr.
#[allow(dead_code)]
pub fn file_settings(body: &Path, delimiter: &str) -> Settings {
    let mut config = TapConfig::default();
    config.listener.port = 0;
    config.output.body = body.to_str().unwrap().to_string();
    config.output.body_delimiter = delimiter.to_string();
    validate_config(&config).unwrap()
}

/// Open sinks and start a server.
#[allow(dead_code)]
pub async fn start_server(settings: &Settings) -> RunningServer {
    let sinks = SinkSet::open(settings).unwrap();
    lifecycle::start(settings, &sinks).await.unwrap()
}

/// Client that does not pool connections, so shutdown is not held up by
/// idle keep-alive sockets.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Send a request head announcing `content_length` bytes followed by only
/// `partial` of the body, leaving the request in flight.
#[allow(dead_code)]
pub async fn start_partial_request(
    addr: SocketAddr,
    content_length: usize,
    partial: &[u8],
) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let head = format!(
        "POST /slow HTTP/1.1\r\nHost: {addr}\r\nContent-Length: {content_length}\r\n\r\n"
    );
    stream.write_all(head.as_bytes()).await.unwrap();
    stream.write_all(partial).await.unwrap();
    stream.flush().await.unwrap();
    stream
}

/// Poll until `check` holds or `timeout` passes.
#[allow(dead_code)]
pub async fn wait_until<F>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
