use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use futures::StreamExt;
use tokio::time;
use tower::ServiceExt;

use raingate_server::models::SensorReading;

use crate::common::mock_app::MockApp;

mod common;

fn live_request() -> Request<Body> {
    Request::builder()
        .uri("/live-rain-sensor")
        .header(header::ACCEPT, "text/event-stream")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_live_feed_pushes_reading_every_period() {
    let app = MockApp::new().await;
    app.services.reading.set(SensorReading::Value(812.0)).await;

    let response = app.router.clone().oneshot(live_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
    assert_eq!(response.headers()[header::CONNECTION], "keep-alive");

    let mut frames = response.into_body().into_data_stream();

    let first = frames.next().await.unwrap().unwrap();
    assert_eq!(&first[..], b"data: 812\n\n");

    app.services.reading.set(SensorReading::Value(250.0)).await;

    // Nothing more until a full period has passed
    assert!(time::timeout(Duration::from_millis(900), frames.next()).await.is_err());

    let second = time::timeout(Duration::from_millis(200), frames.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(&second[..], b"data: 250\n\n");
}

#[tokio::test(start_paused = true)]
async fn test_stalled_viewer_gets_no_backlog() {
    let app = MockApp::new().await;
    app.services.reading.set(SensorReading::Value(812.0)).await;

    let response = app.router.clone().oneshot(live_request()).await.unwrap();
    let mut frames = response.into_body().into_data_stream();

    frames.next().await.unwrap().unwrap();

    // Three and a half periods without reading the stream
    time::advance(Duration::from_millis(3500)).await;

    let resumed = frames.next().await.unwrap().unwrap();
    assert_eq!(&resumed[..], b"data: 812\n\n");

    assert!(time::timeout(Duration::from_millis(100), frames.next()).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_live_feed_sends_loading_before_first_reading() {
    let app = MockApp::new().await;

    let response = app.router.clone().oneshot(live_request()).await.unwrap();
    let mut frames = response.into_body().into_data_stream();

    let first = frames.next().await.unwrap().unwrap();
    assert_eq!(&first[..], b"data: Loading...\n\n");
}

#[tokio::test(start_paused = true)]
async fn test_live_feed_releases_subscriber_on_disconnect() {
    let app = MockApp::new().await;
    let feed = app.services.live_feed.clone();

    assert_eq!(feed.subscribers(), 0);

    let first = app.router.clone().oneshot(live_request()).await.unwrap();
    let second = app.router.clone().oneshot(live_request()).await.unwrap();
    assert_eq!(feed.subscribers(), 2);

    let mut frames = first.into_body().into_data_stream();
    frames.next().await.unwrap().unwrap();
    drop(frames);
    assert_eq!(feed.subscribers(), 1);

    drop(second);
    assert_eq!(feed.subscribers(), 0);
}
