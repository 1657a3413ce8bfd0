use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::SensorReading;

/// The one shared copy of the last known sensor reading.
///
/// Clones share the same cell. The lock is only held to copy the value in or
/// out, never across a device call.
#[derive(Clone, Default)]
pub struct ReadingStore {
    reading: Arc<RwLock<SensorReading>>,
}

impl ReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> SensorReading {
        *self.reading.read().await
    }

    pub async fn set(&self, reading: SensorReading) {
        *self.reading.write().await = reading;
    }
}
