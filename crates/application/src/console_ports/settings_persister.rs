use async_trait::async_trait;
use ledgerdesk_core::AppResult;
use ledgerdesk_domain::SettingsTree;

/// Persistence response for a submitted settings tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The tree was stored.
    Saved,
    /// The backend refused the tree.
    Rejected {
        /// Reason shown to the user.
        message: String,
    },
}

/// Port for storing a complete settings tree.
#[async_trait]
pub trait SettingsPersister: Send + Sync {
    /// Stores the full tree atomically.
    async fn save(&self, tree: &SettingsTree) -> AppResult<PersistOutcome>;
}
