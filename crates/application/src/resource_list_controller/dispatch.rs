use ledgerdesk_core::{AppError, AppResult};
use ledgerdesk_domain::{Entity, EntityId, Notification};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::console_ports::{ActionName, ActionOutcome, ActionRequest, ActionScope};

use super::ResourceListController;

/// Why a dispatch never reached the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSkipReason {
    /// Bulk dispatch with an empty selection.
    NothingSelected,
    /// The target row is not in the collection.
    UnknownEntity,
    /// Another action on this list has not resolved yet.
    ActionPending,
}

/// Resolution of a single-row or bulk action.
#[derive(Debug)]
pub enum ActionResult {
    /// The executor finished the action.
    Completed {
        /// Dispatched action.
        action: ActionName,
        /// Rows reported as changed by the executor.
        affected_count: usize,
    },
    /// The executor rejected the action. The error is passed through as-is.
    Failed {
        /// Dispatched action.
        action: ActionName,
        /// Executor error.
        error: AppError,
    },
    /// Nothing was dispatched.
    Skipped(ActionSkipReason),
}

impl ActionResult {
    /// Returns whether the executor completed the action.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Returns the affected row count of a completed action.
    #[must_use]
    pub fn affected_count(&self) -> Option<usize> {
        match self {
            Self::Completed { affected_count, .. } => Some(*affected_count),
            _ => None,
        }
    }
}

/// Releases the pending flag when dropped, so a dispatch future that is
/// cancelled mid-flight leaves the list usable. Bulk dispatches also clear
/// the selection.
struct PendingAction<'a> {
    controller: &'a ResourceListController,
    clears_selection: bool,
}

impl Drop for PendingAction<'_> {
    fn drop(&mut self) {
        let mut state = self.controller.state();
        state.action_pending = false;
        if self.clears_selection {
            state.selection.clear();
        }
    }
}

impl ResourceListController {
    /// Runs `action` against every selected row.
    ///
    /// The selection is cleared once the executor resolves, whether it
    /// succeeded or failed, and also when the returned future is dropped
    /// before resolving. Exactly one notification is raised per
    /// dispatched action.
    pub async fn dispatch_bulk_action(&self, action: &ActionName) -> ActionResult {
        let targets = {
            let mut state = self.state();
            if state.selection.is_empty() {
                debug!(action = %action, "bulk action skipped: nothing selected");
                return ActionResult::Skipped(ActionSkipReason::NothingSelected);
            }
            if state.action_pending {
                debug!(action = %action, "bulk action skipped: another action is pending");
                return ActionResult::Skipped(ActionSkipReason::ActionPending);
            }

            state.action_pending = true;
            state
                .entities
                .iter()
                .filter(|entity| state.selection.contains(entity.id()))
                .cloned()
                .collect::<Vec<_>>()
        };

        let pending = PendingAction {
            controller: self,
            clears_selection: true,
        };
        let result = self.execute(action, ActionScope::Bulk, targets).await;
        drop(pending);

        self.resolve(action, result)
    }

    /// Runs `action` against one row. The selection is left untouched.
    pub async fn dispatch_action(&self, action: &ActionName, id: &EntityId) -> ActionResult {
        let target = {
            let mut state = self.state();
            if state.action_pending {
                debug!(action = %action, id = %id, "action skipped: another action is pending");
                return ActionResult::Skipped(ActionSkipReason::ActionPending);
            }
            let Some(target) = state
                .entities
                .iter()
                .find(|entity| entity.id() == id)
                .cloned()
            else {
                debug!(action = %action, id = %id, "action skipped: unknown row");
                return ActionResult::Skipped(ActionSkipReason::UnknownEntity);
            };

            state.action_pending = true;
            target
        };

        let pending = PendingAction {
            controller: self,
            clears_selection: false,
        };
        let result = self.execute(action, ActionScope::Single, vec![target]).await;
        drop(pending);

        self.resolve(action, result)
    }

    /// Returns whether an action is awaiting its executor.
    #[must_use]
    pub fn is_action_pending(&self) -> bool {
        self.state().action_pending
    }

    async fn execute(
        &self,
        action: &ActionName,
        scope: ActionScope,
        targets: Vec<Entity>,
    ) -> AppResult<ActionOutcome> {
        let request = ActionRequest {
            operation_id: Uuid::new_v4(),
            action: action.clone(),
            scope,
            targets,
        };
        debug!(
            operation_id = %request.operation_id,
            action = %action,
            scope = scope.as_str(),
            target_count = request.targets.len(),
            "dispatching action"
        );

        self.executor.execute(request).await
    }

    fn resolve(&self, action: &ActionName, result: AppResult<ActionOutcome>) -> ActionResult {
        let label = self.config.label();
        match result {
            Ok(outcome) => {
                info!(
                    action = %action,
                    affected_count = outcome.affected_count,
                    "action completed"
                );
                self.notifications.notify(Notification::success(
                    format!("{action} completed"),
                    format!("{action} applied to {}", label.count(outcome.affected_count)),
                ));
                ActionResult::Completed {
                    action: action.clone(),
                    affected_count: outcome.affected_count,
                }
            }
            Err(error) => {
                warn!(action = %action, error = %error, "action failed");
                self.notifications.notify(Notification::failure(
                    format!("{action} failed"),
                    error.message().to_owned(),
                ));
                ActionResult::Failed {
                    action: action.clone(),
                    error,
                }
            }
        }
    }
}
