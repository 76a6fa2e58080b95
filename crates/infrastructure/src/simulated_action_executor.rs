//! Action executor that stands in for the platform API during development.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use ledgerdesk_application::{ActionExecutor, ActionOutcome, ActionRequest};
use ledgerdesk_core::{AppError, AppResult};
use tracing::info;

/// Executor that waits a fixed delay and then reports every target as
/// affected, unless the action is configured to fail.
#[derive(Debug, Clone, Default)]
pub struct SimulatedActionExecutor {
    delay: Duration,
    failing_actions: HashSet<String>,
}

impl SimulatedActionExecutor {
    /// Creates an executor that always succeeds after `delay`.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failing_actions: HashSet::new(),
        }
    }

    /// Makes the named actions fail. Names compare case-insensitively.
    #[must_use]
    pub fn with_failing_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.failing_actions = actions
            .into_iter()
            .map(|action| action.as_ref().trim().to_lowercase())
            .filter(|action| !action.is_empty())
            .collect();
        self
    }
}

#[async_trait]
impl ActionExecutor for SimulatedActionExecutor {
    async fn execute(&self, request: ActionRequest) -> AppResult<ActionOutcome> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self
            .failing_actions
            .contains(&request.action.as_str().to_lowercase())
        {
            return Err(AppError::Unavailable(format!(
                "{} is temporarily unavailable",
                request.action
            )));
        }

        info!(
            operation_id = %request.operation_id,
            action = %request.action,
            scope = request.scope.as_str(),
            targets = ?request
                .targets
                .iter()
                .map(|target| target.id().as_str())
                .collect::<Vec<_>>(),
            "simulated action executed"
        );

        Ok(ActionOutcome {
            affected_count: request.targets.len(),
        })
    }
}
