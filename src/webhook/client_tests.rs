//! Tests for `ReqwestClient`.
//!
//! These cover construction and transport error mapping. Behaviour against
//! a live callback is covered by the notifier tests through `MockClient`.

use super::{HttpClient, HttpError, HttpRequest, ReqwestClient};
use std::time::Duration;

#[test]
fn default_creates_same_as_new() {
    let client1 = ReqwestClient::new();
    let client2 = ReqwestClient::default();

    assert!(format!("{client1:?}").contains("ReqwestClient"));
    assert!(format!("{client2:?}").contains("ReqwestClient"));
}

#[test]
fn from_client_accepts_custom_client() {
    let custom = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap();
    let client = ReqwestClient::from_client(custom);

    let _ = format!("{client:?}");
}

#[test]
fn client_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReqwestClient>();
}

#[tokio::test]
async fn request_to_invalid_host_returns_error_or_proxy_response() {
    let client = ReqwestClient::new();
    let url = url::Url::parse("http://invalid.invalid.invalid/").unwrap();
    let req = HttpRequest::post(url)
        .with_json(&serde_json::json!({"ok": true}))
        .with_timeout(Duration::from_secs(5));

    let result = client.request(req).await;

    // A proxy in front of the test environment may turn the DNS failure
    // into a 5xx response instead.
    match result {
        Err(HttpError::Connection(_) | HttpError::Timeout) => {}
        Ok(resp) if !resp.is_success() => {}
        other => panic!("Expected transport error or proxy error response, got {other:?}"),
    }
}
