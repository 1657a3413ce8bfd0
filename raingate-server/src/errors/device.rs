use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to reach rain sensor: {0}")]
    Network(String),

    #[error("Failed to parse rain sensor data: {0}")]
    Parse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Failed to reach IR controller: {0}")]
    Network(String),

    #[error("Failed to parse IR controller response: {0}")]
    Parse(String),
}

impl ActionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ActionError::InvalidAction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ActionError::Network(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ActionError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
