//! One-shot position sources and a poller that re-queries them on an interval.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use glass_core::{Coordinates, LocationError};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters
    pub accuracy: Option<f64>,
}

impl Position {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// A platform geolocation provider.
pub trait LocationSource: Send + Sync + 'static {
    fn current_position(&self) -> impl Future<Output = Result<Position, LocationError>> + Send;
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationSource {
    position: Position,
}

impl FixedLocationSource {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            position: Position {
                latitude,
                longitude,
                accuracy: None,
            },
        }
    }

    /// From the configured fixed coordinates, when both are set.
    pub fn from_config(config: &glass_core::LocationConfig) -> Option<Self> {
        config
            .fixed_position()
            .map(|(lat, lon)| Self::new(lat, lon))
    }
}

impl LocationSource for FixedLocationSource {
    async fn current_position(&self) -> Result<Position, LocationError> {
        Ok(self.position)
    }
}

/// Latest outcome of the position query.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationState {
    Pending,
    Located(Position),
    Failed(LocationError),
}

impl LocationState {
    pub fn position(&self) -> Option<Position> {
        match self {
            LocationState::Located(p) => Some(*p),
            _ => None,
        }
    }
}

/// Polls a [`LocationSource`] on a fixed interval and publishes each result.
///
/// Errors are published as they come; there is no fallback position. The
/// background task stops on [`LocationPoller::stop`] or when the poller is
/// dropped.
pub struct LocationPoller {
    rx: watch::Receiver<LocationState>,
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl LocationPoller {
    /// Must be called inside a tokio runtime. The first query runs immediately.
    pub fn spawn<S: LocationSource>(source: Arc<S>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(LocationState::Pending);
        let token = CancellationToken::new();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let state = tokio::select! {
                    _ = task_token.cancelled() => break,
                    result = source.current_position() => match result {
                        Ok(position) => LocationState::Located(position),
                        Err(e) => {
                            tracing::warn!("Location query failed: {}", e);
                            LocationState::Failed(e)
                        }
                    },
                };

                if tx.send(state).is_err() {
                    break;
                }
            }
            tracing::debug!("Location poller stopped");
        });

        Self {
            rx,
            token,
            handle: Some(handle),
        }
    }

    pub fn latest(&self) -> LocationState {
        self.rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LocationState> {
        self.rx.clone()
    }

    /// Wait for the next published state.
    pub async fn changed(&mut self) -> Option<LocationState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    pub fn stop(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for LocationPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
