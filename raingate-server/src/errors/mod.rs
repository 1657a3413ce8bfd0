pub mod device;

pub use device::{ActionError, FetchError};

use axum::response::{IntoResponse, Response};

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        // Manual triggers answer in plain text, browsers alert() the body as is
        (self.status_code(), format!("Error: {self}")).into_response()
    }
}
