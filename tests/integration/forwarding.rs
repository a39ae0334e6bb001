//! Fetcher stdout → forwarder → downstream endpoint.

use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weather_relay::engine::fetcher::Fetcher;
use weather_relay::forward::{self, Forwarder};
use weather_relay::types::VIEW_NAMES;

use crate::fixtures::{self, forecast_payload};
use crate::mock_provider::MockProvider;

async fn fetcher_stdout() -> String {
    let dir = tempfile::tempdir().unwrap();
    let ctx = fixtures::ctx(dir.path(), fixtures::now());
    let out = Fetcher::new(MockProvider::new(forecast_payload("2026-10-16T06:00:00Z")))
        .run(&ctx)
        .await
        .unwrap();
    serde_json::to_string(&out).unwrap()
}

#[tokio::test]
async fn test_relays_each_view_separately() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(202))
        .expect(4)
        .mount(&server)
        .await;

    let stdout = fetcher_stdout().await;
    let output = forward::parse_output(&stdout).unwrap();
    let report = Forwarder::new(&format!("{}/ingest", server.uri()))
        .unwrap()
        .forward(&output)
        .await;
    assert!(report.all_posted());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
    for (req, name) in requests.iter().zip(VIEW_NAMES) {
        assert_eq!(req.url.query(), Some(format!("source=weather_{name}").as_str()));
        let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
        assert_eq!(body, output[name]);
    }

    let today: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(today["precipitation"], serde_json::json!(11.5));
}

#[tokio::test]
async fn test_downstream_errors_are_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .expect(4)
        .mount(&server)
        .await;

    let output = forward::parse_output(&fetcher_stdout().await).unwrap();
    let report = Forwarder::new(&server.uri()).unwrap().forward(&output).await;

    assert!(!report.all_posted());
    assert_eq!(report.failed.len(), 4);
    assert!(forward::is_changed(&output));
}

/// Pipe `stdin` into the forwarder binary and wait for it to exit.
async fn run_forwarder(args: &[&str], stdin: &str) -> std::process::Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_weather-forward"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    let mut pipe = child.stdin.take().unwrap();
    pipe.write_all(stdin.as_bytes()).await.unwrap();
    drop(pipe);
    child.wait_with_output().await.unwrap()
}

#[tokio::test]
async fn test_skip_unchanged_posts_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut output = forward::parse_output(&fetcher_stdout().await).unwrap();
    output["changed"] = false.into();

    let target = server.uri();
    let result = run_forwarder(&[target.as_str(), "--skip-unchanged"], &output.to_string()).await;

    assert!(result.status.success());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_skip_unchanged_still_posts_changed_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(200))
        .expect(4)
        .mount(&server)
        .await;

    let stdout = fetcher_stdout().await;
    let target = format!("{}/ingest", server.uri());
    let result = run_forwarder(&[target.as_str(), "--skip-unchanged"], &stdout).await;

    assert!(result.status.success());
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_unchanged_output_is_posted_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(4)
        .mount(&server)
        .await;

    let mut output = forward::parse_output(&fetcher_stdout().await).unwrap();
    output["changed"] = false.into();

    let target = server.uri();
    let result = run_forwarder(&[target.as_str()], &output.to_string()).await;

    assert!(result.status.success());
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}
