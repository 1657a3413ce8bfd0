use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// What the simulated rain sensor answers with.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorMode {
    /// `StatusSNS.ANALOG.A1` carries this level
    Value(f64),
    /// `StatusSNS` without an `ANALOG` block
    Missing,
    /// A body that is not JSON
    Garbage,
}

/// What the simulated IR controller answers with.
#[derive(Debug, Clone, PartialEq)]
pub enum IrMode {
    Ack(String),
    Missing,
    Garbage,
}

struct SensorState {
    mode: RwLock<SensorMode>,
    hits: AtomicUsize,
}

struct IrState {
    mode: RwLock<IrMode>,
    commands: Mutex<Vec<String>>,
}

/// Tasmota style analog rain sensor answering `Status 10` on every path.
pub struct MockSensor {
    address: SocketAddr,
    state: Arc<SensorState>,
    task: JoinHandle<()>,
}

impl MockSensor {
    pub async fn spawn(address: SocketAddr, mode: SensorMode) -> io::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        let address = listener.local_addr()?;

        let state = Arc::new(SensorState {
            mode: RwLock::new(mode),
            hits: AtomicUsize::new(0),
        });

        let app = Router::new()
            .fallback(sensor_status)
            .with_state(Arc::clone(&state));

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("mock sensor stopped: {}", e);
            }
        });

        Ok(Self { address, state, task })
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub async fn set_mode(&self, mode: SensorMode) {
        *self.state.mode.write().await = mode;
    }

    /// Number of requests served so far.
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockSensor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Tasmota style IR bridge. Every request is recorded as its path and query.
pub struct MockIrController {
    address: SocketAddr,
    state: Arc<IrState>,
    task: JoinHandle<()>,
}

impl MockIrController {
    pub async fn spawn(address: SocketAddr, mode: IrMode) -> io::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        let address = listener.local_addr()?;

        let state = Arc::new(IrState {
            mode: RwLock::new(mode),
            commands: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(ir_send)
            .with_state(Arc::clone(&state));

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("mock ir controller stopped: {}", e);
            }
        });

        Ok(Self { address, state, task })
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub async fn set_mode(&self, mode: IrMode) {
        *self.state.mode.write().await = mode;
    }

    /// Received requests in arrival order.
    pub async fn commands(&self) -> Vec<String> {
        self.state.commands.lock().await.clone()
    }
}

impl Drop for MockIrController {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// An address nothing listens on, for simulating an offline device.
pub async fn unreachable_address() -> io::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;

    listener.local_addr()
}

async fn sensor_status(State(state): State<Arc<SensorState>>, uri: Uri) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    tracing::debug!("sensor request {}", uri);

    let time = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();

    match &*state.mode.read().await {
        SensorMode::Value(level) => Json(json!({
            "StatusSNS": {
                "Time": time,
                "ANALOG": { "A1": level }
            }
        }))
        .into_response(),
        SensorMode::Missing => Json(json!({ "StatusSNS": { "Time": time } })).into_response(),
        SensorMode::Garbage => (StatusCode::OK, "<html>sensor busy</html>").into_response(),
    }
}

async fn ir_send(State(state): State<Arc<IrState>>, uri: Uri) -> Response {
    let command = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    tracing::debug!("ir request {}", command);

    state.commands.lock().await.push(command);

    match &*state.mode.read().await {
        IrMode::Ack(reply) => Json(json!({ "IRSend": reply })).into_response(),
        IrMode::Missing => Json(json!({})).into_response(),
        IrMode::Garbage => (StatusCode::OK, "IRSend?").into_response(),
    }
}
