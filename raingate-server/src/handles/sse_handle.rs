use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::http::header;
use axum::response::sse::Event;
use axum::response::{IntoResponse, Sse};
use tokio::time::{MissedTickBehavior, interval};
use tokio_stream::{StreamExt, wrappers};

use crate::models::SensorReading;
use crate::services::ReadingStore;

/// Keeps count of the browsers currently streaming the live reading.
#[derive(Clone, Default)]
pub struct LiveFeed {
    subscribers: Arc<AtomicUsize>,
}

impl LiveFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribers(&self) -> usize {
        self.subscribers.load(Ordering::SeqCst)
    }

    fn subscribe(&self, reading: ReadingStore) -> Subscriber {
        let count = self.subscribers.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("live viewer connected, {} open", count);

        Subscriber {
            reading,
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

/// Lives exactly as long as one stream response.
struct Subscriber {
    reading: ReadingStore,
    subscribers: Arc<AtomicUsize>,
}

impl Subscriber {
    async fn current(&self) -> SensorReading {
        self.reading.get().await
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        let count = self.subscribers.fetch_sub(1, Ordering::SeqCst) - 1;
        tracing::debug!("live viewer disconnected, {} open", count);
    }
}

#[derive(Clone)]
pub struct SSEState {
    pub reading: ReadingStore,
    pub period: Duration,
    pub feed: LiveFeed,
}

/// Sends the current reading right away, then once per period until the
/// client goes away. The interval belongs to the stream and is dropped with it.
pub async fn sse_handler(State(state): State<SSEState>) -> impl IntoResponse {
    let subscriber = Arc::new(state.feed.subscribe(state.reading.clone()));

    // A viewer that stalls gets one fresh event on resume, not a backlog
    let mut ticks = interval(state.period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let stream = wrappers::IntervalStream::new(ticks).then(move |_| {
        let subscriber = Arc::clone(&subscriber);
        async move {
            let reading = subscriber.current().await;
            Ok::<_, Infallible>(Event::default().data(reading.to_string()))
        }
    });

    ([(header::CONNECTION, "keep-alive")], Sse::new(stream))
}
