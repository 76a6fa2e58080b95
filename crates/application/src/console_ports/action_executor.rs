use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use ledgerdesk_core::{AppResult, NonEmptyString};
use ledgerdesk_domain::Entity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of a row action such as `Suspend`, `Activate` or `Export`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionName(NonEmptyString);

impl ActionName {
    /// Creates a validated action name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        NonEmptyString::new(value).map(Self)
    }

    /// Returns the action name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ActionName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Whether an action targets one row or the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionScope {
    /// One row picked directly.
    Single,
    /// Every selected row.
    Bulk,
}

impl ActionScope {
    /// Returns the lowercase scope name used as a log field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Bulk => "bulk",
        }
    }
}

/// Dispatch payload handed to the action executor.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    /// Correlation id for logs.
    pub operation_id: Uuid,
    /// Requested action.
    pub action: ActionName,
    /// Single-row or bulk dispatch.
    pub scope: ActionScope,
    /// Snapshot of the targeted rows.
    pub targets: Vec<Entity>,
}

/// Executor response for a completed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Number of rows the action changed.
    pub affected_count: usize,
}

/// Port for carrying out row actions against the backing system.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Executes one action request.
    async fn execute(&self, request: ActionRequest) -> AppResult<ActionOutcome>;
}
