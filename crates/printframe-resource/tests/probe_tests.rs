//! Tests for the headless image probe against a local HTTP fixture.

use printframe_resource::probe::ImageFormat;
use printframe_resource::{CorsMode, ImageProbe, ProbeError};
use std::io::Cursor;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APP_ORIGIN: &str = "http://app.local";

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::RgbaImage::new(width, height)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[tokio::test]
async fn test_anonymous_probe_accepts_opted_in_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cat.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("access-control-allow-origin", "*")
                .set_body_bytes(png_bytes(4, 3)),
        )
        .mount(&mock_server)
        .await;

    let probe = ImageProbe::new(APP_ORIGIN).unwrap();
    let url = format!("{}/cat.png", mock_server.uri());
    let image = probe.probe(&url, CorsMode::Anonymous).await.unwrap();

    assert_eq!(image.format, ImageFormat::Raster);
    assert_eq!(image.dimensions, Some((4, 3)));
}

#[tokio::test]
async fn test_anonymous_probe_rejects_response_without_cors_header() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cat.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(1, 1)))
        .mount(&mock_server)
        .await;

    let probe = ImageProbe::new(APP_ORIGIN).unwrap();
    let url = format!("{}/cat.png", mock_server.uri());

    let err = probe.probe(&url, CorsMode::Anonymous).await.unwrap_err();
    assert!(matches!(err, ProbeError::CorsBlocked { .. }));

    // The same host serves the bare request.
    let image = probe.probe(&url, CorsMode::NoCors).await.unwrap();
    assert_eq!(image.dimensions, Some((1, 1)));
}

#[tokio::test]
async fn test_probe_rejects_non_image_bytes() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain text, not pixels"))
        .mount(&mock_server)
        .await;

    let probe = ImageProbe::new(APP_ORIGIN).unwrap();
    let url = format!("{}/page", mock_server.uri());
    let err = probe.probe(&url, CorsMode::NoCors).await.unwrap_err();
    assert!(matches!(err, ProbeError::Decode(_)));
}

#[tokio::test]
async fn test_probe_reports_http_errors() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.png"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&mock_server)
        .await;

    let probe = ImageProbe::new(APP_ORIGIN).unwrap();
    let url = format!("{}/gone.png", mock_server.uri());
    let err = probe.probe(&url, CorsMode::NoCors).await.unwrap_err();
    assert!(matches!(err, ProbeError::Fetch(_)));
}
