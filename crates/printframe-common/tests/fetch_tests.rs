//! Tests for the headless fetch helpers against a local HTTP fixture.

use printframe_common::net::{FetchError, client, fetch, fetch_text};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_cors_request_sends_origin_and_reports_allow_origin() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cat.png"))
        .and(header("origin", "http://app.local"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("access-control-allow-origin", "*")
                .insert_header("content-type", "image/png")
                .set_body_bytes(vec![1, 2, 3]),
        )
        .mount(&mock_server)
        .await;

    let http = client().unwrap();
    let url = format!("{}/cat.png", mock_server.uri());
    let fetched = fetch(&http, &url, Some("http://app.local")).await.unwrap();

    assert_eq!(fetched.body, vec![1, 2, 3]);
    assert_eq!(fetched.allow_origin.as_deref(), Some("*"));
    assert_eq!(fetched.content_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.css"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let http = client().unwrap();
    let url = format!("{}/missing.css", mock_server.uri());
    let err = fetch_text(&http, &url).await.unwrap_err();

    assert!(matches!(err, FetchError::Status(status) if status.as_u16() == 404));
}

#[tokio::test]
async fn test_data_url_needs_no_network() {
    let http = client().unwrap();
    let fetched = fetch(&http, "data:text/plain,hello", Some("http://app.local"))
        .await
        .unwrap();
    assert_eq!(fetched.body, b"hello");
    assert_eq!(fetched.allow_origin.as_deref(), Some("*"));
}
