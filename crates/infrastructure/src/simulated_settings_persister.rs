//! Settings persister that keeps the last payload in memory.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ledgerdesk_application::{PersistOutcome, SettingsPersister};
use ledgerdesk_core::AppResult;
use ledgerdesk_domain::SettingsTree;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

/// Development persister that waits a fixed delay and stores the submitted
/// tree as JSON.
#[derive(Debug, Default)]
pub struct SimulatedSettingsPersister {
    delay: Duration,
    rejection: Option<String>,
    saved: RwLock<Option<Value>>,
    save_count: AtomicU64,
}

impl SimulatedSettingsPersister {
    /// Creates a persister that accepts every tree after `delay`.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Makes every save fail with `message`.
    #[must_use]
    pub fn rejecting(mut self, message: impl Into<String>) -> Self {
        self.rejection = Some(message.into());
        self
    }

    /// Returns the last stored payload.
    pub async fn last_saved(&self) -> Option<Value> {
        self.saved.read().await.clone()
    }

    /// Returns how many saves were submitted, including rejected ones.
    #[must_use]
    pub fn save_count(&self) -> u64 {
        self.save_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SettingsPersister for SimulatedSettingsPersister {
    async fn save(&self, tree: &SettingsTree) -> AppResult<PersistOutcome> {
        let payload = tree.to_json();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.save_count.fetch_add(1, Ordering::Relaxed);
        if let Some(message) = &self.rejection {
            return Ok(PersistOutcome::Rejected {
                message: message.clone(),
            });
        }

        info!(sections = tree.len(), "simulated settings persisted");
        *self.saved.write().await = Some(payload);
        Ok(PersistOutcome::Saved)
    }
}
