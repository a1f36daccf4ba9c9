//! Integration tests for `POST /generate`
//!
//! The router is served on an ephemeral port and driven with a real HTTP
//! client. Tests that rasterize need a local Chrome and are `#[ignore]`d.

use httpmock::prelude::*;
use posterforge::server::{create_router, AppState};
use serde_json::json;

async fn spawn_app() -> String {
    let state = AppState::new(2).expect("Failed to build app state");
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn png_dimensions(png: &[u8]) -> (u32, u32) {
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n", "missing PNG signature");
    // IHDR width/height are big-endian u32 at offsets 16 and 20
    let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
    (width, height)
}

#[tokio::test]
async fn missing_url_is_rejected_with_structured_400() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/generate", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Missing url" }));
}

#[tokio::test]
async fn zero_dimension_is_rejected_with_structured_400() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/generate", base))
        .json(&json!({ "url": "https://example.com/", "size": { "w": 0, "h": 600 } }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid size" }));
}

#[tokio::test]
async fn negative_dimension_is_rejected_with_structured_400() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/generate", base))
        .json(&json!({ "url": "https://example.com/", "size": { "w": -5, "h": 600 } }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid size" }));
}

#[tokio::test]
#[ignore] // Requires Chrome to be installed
async fn default_render_produces_1200_by_1600_png() {
    let origin = MockServer::start_async().await;
    origin
        .mock_async(|when, then| {
            when.method(GET).path("/article");
            then.status(200).header("content-type", "text/html").body(
                r#"<html><head>
                    <meta property="og:title" content="Endpoint Test">
                    <meta property="og:description" content="desc">
                </head><body></body></html>"#,
            );
        })
        .await;

    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/generate", base))
        .json(&json!({ "url": origin.url("/article") }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "image/png"
    );
    let png = resp.bytes().await.unwrap();
    assert_eq!(png_dimensions(&png), (1200, 1600));
}

#[tokio::test]
#[ignore] // Requires Chrome to be installed
async fn requested_size_is_honored_exactly() {
    let origin = MockServer::start_async().await;
    origin
        .mock_async(|when, then| {
            when.method(GET).path("/article");
            then.status(200)
                .header("content-type", "text/html")
                .body("<html><head><title>Sized</title></head><body></body></html>");
        })
        .await;

    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/generate", base))
        .json(&json!({
            "url": origin.url("/article"),
            "template": "clean",
            "size": { "w": 800, "h": 600 }
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let png = resp.bytes().await.unwrap();
    assert_eq!(png_dimensions(&png), (800, 600));
}

#[tokio::test]
#[ignore] // Requires Chrome to be installed
async fn unresolvable_article_still_renders_placeholder_poster() {
    // Metadata resolution fails (nothing listens); the poster renders with
    // placeholder text rather than failing the request.
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/generate", base))
        .json(&json!({ "url": "http://127.0.0.1:9/missing", "size": { "w": 400, "h": 300 } }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let png = resp.bytes().await.unwrap();
    assert_eq!(png_dimensions(&png), (400, 300));
}
