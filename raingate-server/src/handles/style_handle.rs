use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tokio::fs;

#[derive(Clone)]
pub struct StyleState {
    pub stylesheet: String,
}

pub async fn get_stylesheet(State(state): State<StyleState>) -> Response {
    match fs::read_to_string(&state.stylesheet).await {
        Ok(css) => ([(header::CONTENT_TYPE, "text/css")], css).into_response(),
        Err(e) => {
            tracing::error!("error reading {}: {}", state.stylesheet, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error reading CSS file").into_response()
        }
    }
}
