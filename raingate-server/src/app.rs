use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::routing::get;
use config::ConfigError;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::configs::Settings;
use crate::handles::*;
use crate::services::{DeviceService, ReadingStore};

/// Shared between the monitor and the request handlers.
#[derive(Clone)]
pub struct AppServices {
    pub reading: ReadingStore,
    pub device_service: Arc<DeviceService>,
    pub live_feed: LiveFeed,
}

impl AppServices {
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        let device_service = DeviceService::new(settings.devices.clone(), settings.endpoints.clone())?;

        Ok(Self {
            reading: ReadingStore::new(),
            device_service: Arc::new(device_service),
            live_feed: LiveFeed::new(),
        })
    }
}

pub fn create_app(settings: &Arc<Settings>, services: &AppServices) -> Router {
    let status = Router::new()
        .route("/", get(get_status))
        .with_state(StatusState {
            reading: services.reading.clone(),
            rainlevel: settings.rainlevel.clone(),
            server: settings.server.clone(),
            buttons: Arc::new(settings.buttons.clone()),
        });

    let live = Router::new()
        .route("/live-rain-sensor", get(sse_handler))
        .with_state(SSEState {
            reading: services.reading.clone(),
            period: settings.timings.period(),
            feed: services.live_feed.clone(),
        });

    let actions = Router::new()
        .route("/m/", get(execute_blank_action))
        .route("/m/*action", get(execute_action))
        .with_state(ActionState {
            device_service: services.device_service.clone(),
        });

    let style = Router::new()
        .route("/style.css", get(get_stylesheet))
        .with_state(StyleState {
            stylesheet: settings.server.stylesheet.clone(),
        });

    Router::new()
        .merge(status)
        .merge(live)
        .merge(actions)
        .merge(style)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    tracing::info_span!("request", method = %request.method(), path = %request.uri().path())
                })
                .on_request(())
                // Streams log their status once, when the headers go out
                .on_response(|response: &Response<Body>, latency: Duration, _span: &Span| {
                    tracing::info!(status = response.status().as_u16(), ?latency, "responded");
                })
                .on_failure(()),
        )
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
