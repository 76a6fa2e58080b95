use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use ledgerdesk_core::{AppError, AppResult, NonEmptyString};
use ledgerdesk_domain::{KeyPath, Scalar, SettingsToggle, SettingsTree, SettingsValue};
use serde::Serialize;
use tracing::debug;

use crate::console_ports::{NotificationSink, SecretGenerator, SettingsPersister};

mod save;
mod secrets;

#[cfg(test)]
mod tests;

pub use save::SaveResult;

/// Static configuration of one settings form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFormConfig {
    section_label: NonEmptyString,
    notification_hold: Duration,
}

impl SettingsFormConfig {
    /// Creates a configuration for the section named `section_label`, such
    /// as `General settings`.
    pub fn new(section_label: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            section_label: NonEmptyString::new(section_label)?,
            notification_hold: Duration::ZERO,
        })
    }

    /// Keeps the terminal save state visible for `hold` before returning to
    /// idle.
    #[must_use]
    pub fn with_notification_hold(mut self, hold: Duration) -> Self {
        self.notification_hold = hold;
        self
    }

    /// Returns the section label.
    #[must_use]
    pub fn section_label(&self) -> &str {
        self.section_label.as_str()
    }

    /// Returns how long terminal save states stay visible.
    #[must_use]
    pub fn notification_hold(&self) -> Duration {
        self.notification_hold
    }
}

/// Lifecycle of the form's save operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    /// No save in flight.
    #[default]
    Idle,
    /// Waiting for the persister.
    Pending,
    /// Last save was stored; shown until the notification hold elapses.
    Succeeded,
    /// Last save failed; shown until the notification hold elapses.
    Failed,
}

impl SaveStatus {
    /// Returns the lowercase status name used in logs and view state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Default)]
struct SettingsFormState {
    initialized: bool,
    tree: SettingsTree,
    baseline: SettingsTree,
    status: SaveStatus,
    save_generation: u64,
    visible_secrets: BTreeSet<KeyPath>,
}

/// Editor for one nested settings tree with an optimistic save lifecycle.
pub struct SettingsFormController {
    config: SettingsFormConfig,
    persister: Arc<dyn SettingsPersister>,
    notifications: Arc<dyn NotificationSink>,
    secret_generator: Option<Arc<dyn SecretGenerator>>,
    state: Mutex<SettingsFormState>,
}

impl SettingsFormController {
    /// Creates an uninitialized form controller.
    #[must_use]
    pub fn new(
        config: SettingsFormConfig,
        persister: Arc<dyn SettingsPersister>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            config,
            persister,
            notifications,
            secret_generator: None,
            state: Mutex::new(SettingsFormState::default()),
        }
    }

    /// Enables secret regeneration with `secret_generator`.
    #[must_use]
    pub fn with_secret_generator(mut self, secret_generator: Arc<dyn SecretGenerator>) -> Self {
        self.secret_generator = Some(secret_generator);
        self
    }

    /// Returns the form configuration.
    #[must_use]
    pub fn config(&self) -> &SettingsFormConfig {
        &self.config
    }

    fn state(&self) -> MutexGuard<'_, SettingsFormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads the starting tree. May only be called once per form.
    pub fn initialize(&self, defaults: SettingsTree) -> AppResult<()> {
        let mut state = self.state();
        if state.initialized {
            return Err(AppError::Conflict(format!(
                "{} form is already initialized",
                self.config.section_label()
            )));
        }

        state.initialized = true;
        state.baseline = defaults.clone();
        state.tree = defaults;
        Ok(())
    }

    /// Discards every edit and visibility toggle, starting over from
    /// `defaults`.
    ///
    /// The save status returns to idle. A save still in flight keeps its
    /// notification but no longer changes the status or the baseline.
    pub fn reset(&self, defaults: SettingsTree) {
        let mut state = self.state();
        state.initialized = true;
        state.baseline = defaults.clone();
        state.tree = defaults;
        state.visible_secrets.clear();
        state.status = SaveStatus::Idle;
        state.save_generation = state.save_generation.wrapping_add(1);
        debug!(section = self.config.section_label(), "settings form reset");
    }

    /// Stores `value` at `path`. Sections off the path keep their identity.
    pub fn update(&self, path: &KeyPath, value: impl Into<SettingsValue>) -> AppResult<()> {
        let mut state = self.state();
        let updated = state.tree.with_value(path, value.into())?;
        state.tree = updated;
        Ok(())
    }

    /// Returns a handle to the current tree.
    #[must_use]
    pub fn tree(&self) -> SettingsTree {
        self.state().tree.clone()
    }

    /// Reads the node at `path`.
    #[must_use]
    pub fn value(&self, path: &KeyPath) -> Option<SettingsValue> {
        self.state().tree.get(path)
    }

    /// Returns whether the tree differs from the last initialized, reset or
    /// saved version.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        let state = self.state();
        !state.tree.ptr_eq(&state.baseline) && state.tree != state.baseline
    }

    /// Returns the save lifecycle state.
    #[must_use]
    pub fn save_status(&self) -> SaveStatus {
        self.state().status
    }

    /// Writes one catalog switch.
    pub fn set_toggle<T: SettingsToggle>(&self, toggle: T, enabled: bool) -> AppResult<()> {
        self.update(&toggle.key_path(), enabled)
    }

    /// Returns every switch of a catalog with its current value. Missing or
    /// non-boolean values read as off.
    #[must_use]
    pub fn toggle_states<T: SettingsToggle>(&self) -> Vec<(T, bool)> {
        let tree = self.tree();
        T::all()
            .iter()
            .map(|toggle| {
                let enabled = tree
                    .scalar(&toggle.key_path())
                    .as_ref()
                    .and_then(Scalar::as_bool)
                    .unwrap_or(false);
                (*toggle, enabled)
            })
            .collect()
    }
}
