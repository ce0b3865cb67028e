//! End-to-end capture tests against a live listener.

use std::time::Duration;

use http_tap::lifecycle::LifecycleState;

mod common;

#[tokio::test]
async fn test_body_captured_with_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let body_path = dir.path().join("bodies.out");
    let settings = common::file_settings(&body_path, "\n");
    let server = common::start_server(&settings).await;
    assert_eq!(server.state(), LifecycleState::Listening);

    let payload: Vec<u8> = (0..=255u8).cycle().take(200_000).collect();
    let res = common::client()
        .post(format!("http://{}/any/path?x=1", server.local_addr()))
        .body(payload.clone())
        .send()
        .await
        .expect("tap unreachable");
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    assert!(res.bytes().await.unwrap().is_empty());

    server.shutdown(Duration::from_secs(5)).await.unwrap();

    let mut expected = payload;
    expected.push(b'\n');
    assert_eq!(std::fs::read(&body_path).unwrap(), expected);
}

#[tokio::test]
async fn test_every_method_and_path_is_captured() {
    let dir = tempfile::tempdir().unwrap();
    let body_path = dir.path().join("bodies.out");
    let settings = common::file_settings(&body_path, ";");
    let server = common::start_server(&settings).await;
    let base = format!("http://{}", server.local_addr());
    let client = common::client();

    let res = client.put(format!("{base}/")).body("a").send().await.unwrap();
    assert_eq!(res.status(), 200);
    let res = client.patch(format!("{base}/deep/nested/path")).body("b").send().await.unwrap();
    assert_eq!(res.status(), 200);
    let res = client.delete(format!("{base}/x")).body("c").send().await.unwrap();
    assert_eq!(res.status(), 200);

    server.shutdown(Duration::from_secs(5)).await.unwrap();
    assert_eq!(std::fs::read(&body_path).unwrap(), b"a;b;c;");
}

#[tokio::test]
async fn test_bodiless_request_produces_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let body_path = dir.path().join("bodies.out");
    let settings = common::file_settings(&body_path, "\n");
    let server = common::start_server(&settings).await;
    let base = format!("http://{}", server.local_addr());
    let client = common::client();

    let res = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let res = client.post(format!("{base}/empty")).body("").send().await.unwrap();
    assert_eq!(res.status(), 200);

    server.shutdown(Duration::from_secs(5)).await.unwrap();
    assert_eq!(std::fs::read(&body_path).unwrap(), b"");
}

#[tokio::test]
async fn test_client_request_id_is_echoed() {
    let dir = tempfile::tempdir().unwrap();
    let body_path = dir.path().join("bodies.out");
    let settings = common::file_settings(&body_path, "\n");
    let server = common::start_server(&settings).await;

    let res = common::client()
        .post(format!("http://{}/", server.local_addr()))
        .header("x-request-id", "client-7")
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "client-7");

    server.shutdown(Duration::from_secs(5)).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_requests_total_length() {
    let dir = tempfile::tempdir().unwrap();
    let body_path = dir.path().join("bodies.out");
    let delimiter = "\n--\n";
    let settings = common::file_settings(&body_path, delimiter);
    let server = common::start_server(&settings).await;
    let url = format!("http://{}/concurrent", server.local_addr());

    let requests = 20usize;
    let body_len = 4096usize;
    let client = common::client();
    let mut handles = Vec::new();
    for i in 0..requests {
        let client = client.clone();
        let url = url.clone();
        handles.push(tokio::spawn(async move {
            let body = vec![b'a' + (i % 26) as u8; body_len];
            client.post(url).body(body).send().await.unwrap().status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), 200);
    }

    server.shutdown(Duration::from_secs(5)).await.unwrap();

    let written = std::fs::read(&body_path).unwrap();
    assert_eq!(written.len(), requests * (body_len + delimiter.len()));
}

#[tokio::test]
async fn test_headers_destination_receives_headers() {
    let dir = tempfile::tempdir().unwrap();
    let body_path = dir.path().join("bodies.out");
    let headers_path = dir.path().join("headers.out");
    let mut config = http_tap::TapConfig::default();
    config.listener.port = 0;
    config.output.body = body_path.to_str().unwrap().into();
    config.output.headers = headers_path.to_str().unwrap().into();
    let settings = http_tap::config::validate_config(&config).unwrap();
    let server = common::start_server(&settings).await;

    common::client()
        .post(format!("http://{}/", server.local_addr()))
        .header("x-trace-marker", "abc123")
        .body("payload")
        .send()
        .await
        .unwrap();

    server.shutdown(Duration::from_secs(5)).await.unwrap();

    let headers = std::fs::read_to_string(&headers_path).unwrap();
    assert!(headers.contains("x-trace-marker: abc123\n"));
    assert!(headers.contains("content-length: 7\n"));
    assert!(headers.ends_with("\n\n"));
    assert_eq!(std::fs::read(&body_path).unwrap(), b"payload\n");
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_write_failure_still_answers_ok() {
    let settings = common::file_settings(std::path::Path::new("/dev/full"), "\n");
    let server = common::start_server(&settings).await;

    let res = common::client()
        .post(format!("http://{}/full", server.local_addr()))
        .body("nowhere to go")
        .send()
        .await
        .expect("tap unreachable");
    assert_eq!(res.status(), 200);
    assert!(res.bytes().await.unwrap().is_empty());
    assert_eq!(server.in_flight().active_count(), 0);

    server.shutdown(Duration::from_secs(5)).await.unwrap();
}
