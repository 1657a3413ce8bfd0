use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::configs::{RainLevel, Timings};
use crate::errors::{ActionError, FetchError};
use crate::models::SensorReading;
use crate::services::device_service::DeviceService;
use crate::services::reading_store::ReadingStore;

/// Outcome of one rain check.
#[derive(Debug)]
pub enum Enforcement {
    Idle,
    /// Every close action with its own result, in configured order
    Closing(Vec<(String, Result<String, ActionError>)>),
}

/// Periodic sensor refresh plus the rain check that closes the windows.
///
/// Both run on their own timer with the same period. They are not chained, so
/// a rain check may see a reading that is up to one period old.
pub struct MonitorService {
    device_service: Arc<DeviceService>,
    reading: ReadingStore,
    timings: Timings,
    rainlevel: RainLevel,
}

impl MonitorService {
    pub fn new(
        device_service: Arc<DeviceService>,
        reading: ReadingStore,
        timings: Timings,
        rainlevel: RainLevel,
    ) -> Self {
        Self {
            device_service,
            reading,
            timings,
            rainlevel,
        }
    }

    /// Fetches a fresh reading. A failed fetch keeps the previous reading.
    pub async fn refresh_once(&self) -> Result<SensorReading, FetchError> {
        match self.device_service.fetch_sensor_reading().await {
            Ok(reading) => {
                self.reading.set(reading).await;
                Ok(reading)
            }
            Err(e) => {
                tracing::error!("keeping last reading, refresh failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn enforce_once(&self) -> Enforcement {
        let reading = self.reading.get().await;
        let threshold = self.rainlevel.threshold;

        if !reading.is_raining(threshold) {
            tracing::info!("not raining ({}), no action taken", reading);
            return Enforcement::Idle;
        }

        tracing::warn!("raining ({} < {}), closing windows", reading, threshold);

        let outcomes = join_all(self.rainlevel.close_actions.iter().map(|action| async move {
            let result = self.device_service.trigger_action(action).await;

            match &result {
                Ok(reply) => tracing::info!("{} triggered: {}", action, reply),
                Err(e) => tracing::error!("failed to trigger {}: {}", action, e),
            }

            (action.clone(), result)
        }))
        .await;

        Enforcement::Closing(outcomes)
    }

    /// Starts both timers. Each fires for the first time one period from now.
    pub fn start(self: &Arc<Self>) -> MonitorHandle {
        let period = self.timings.period();

        tracing::info!("monitoring every {:?}, rain below {}", period, self.rainlevel.threshold);

        let refresh = {
            let monitor = Arc::clone(self);
            tokio::spawn(async move {
                let mut interval = time::interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    interval.tick().await;
                    let monitor = Arc::clone(&monitor);
                    tokio::spawn(async move {
                        let _ = monitor.refresh_once().await;
                    });
                }
            })
        };

        let enforcement = {
            let monitor = Arc::clone(self);
            tokio::spawn(async move {
                let mut interval = time::interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    interval.tick().await;
                    let monitor = Arc::clone(&monitor);
                    tokio::spawn(async move {
                        monitor.enforce_once().await;
                    });
                }
            })
        };

        MonitorHandle { refresh, enforcement }
    }
}

/// Stops both timers when dropped. Ticks already in flight run to completion.
pub struct MonitorHandle {
    refresh: JoinHandle<()>,
    enforcement: JoinHandle<()>,
}

impl MonitorHandle {
    pub fn shutdown(self) {
        tracing::info!("monitor stopped");
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.refresh.abort();
        self.enforcement.abort();
    }
}
