use std::sync::Arc;

use crate::storage::{persist, read_json, KeyValueStore, RAIN_DEMO_MODE_KEY};

/// Persisted on/off flag for the rain forecast's simulated data.
pub struct DemoModeStore {
    kv: Arc<dyn KeyValueStore>,
    enabled: bool,
}

impl DemoModeStore {
    pub fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        let enabled = match read_json::<bool>(kv.as_ref(), RAIN_DEMO_MODE_KEY) {
            Ok(stored) => stored.unwrap_or(false),
            Err(e) => {
                tracing::error!("Error reading demo mode from storage: {}", e);
                false
            }
        };
        Self { kv, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set(&mut self, enabled: bool) {
        self.enabled = enabled;
        persist(self.kv.as_ref(), RAIN_DEMO_MODE_KEY, &self.enabled);
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.set(!self.enabled);
        self.enabled
    }
}
