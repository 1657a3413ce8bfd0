use std::sync::Arc;

use axum::extract::{Path, State};

use crate::errors::ActionError;
use crate::services::DeviceService;

#[derive(Clone)]
pub struct ActionState {
    pub device_service: Arc<DeviceService>,
}

/// Everything after `/m/` is the action name, slashes included.
pub async fn execute_action(
    Path(action): Path<String>,
    State(state): State<ActionState>,
) -> Result<String, ActionError> {
    trigger(&state, &action).await
}

/// `/m/` with nothing after it.
pub async fn execute_blank_action(State(state): State<ActionState>) -> Result<String, ActionError> {
    trigger(&state, "").await
}

async fn trigger(state: &ActionState, action: &str) -> Result<String, ActionError> {
    let reply = state.device_service.trigger_action(action).await?;

    Ok(format!("Response: {reply}"))
}
