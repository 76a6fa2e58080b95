use ledgerdesk_domain::Notification;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::console_ports::PersistOutcome;

use super::{SaveStatus, SettingsFormController};

/// Resolution of one [`SettingsFormController::save`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveResult {
    /// The tree was stored.
    Succeeded {
        /// Text shown to the user.
        message: String,
    },
    /// The persister rejected or failed the save.
    Failed {
        /// Text shown to the user.
        message: String,
    },
    /// Another save was still pending; nothing was submitted.
    Rejected,
}

/// Returns the form to [`SaveStatus::Idle`] when dropped, unless a newer save
/// or a reset has taken over. Covers both the hold elapsing and the save
/// future being cancelled before the persister answers.
struct SaveInFlight<'a> {
    form: &'a SettingsFormController,
    generation: u64,
}

impl Drop for SaveInFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.form.state();
        if state.save_generation == self.generation {
            state.status = SaveStatus::Idle;
        }
    }
}

impl SettingsFormController {
    /// Submits the whole tree to the persister.
    ///
    /// Exactly one notification is raised for every submitted save. The
    /// terminal status stays visible for the configured hold and is back to
    /// [`SaveStatus::Idle`] when this returns. A call made while another save
    /// is pending returns [`SaveResult::Rejected`] without touching the
    /// persister. Dropping the future before it resolves returns the form to
    /// idle and keeps the unsaved edits.
    pub async fn save(&self) -> SaveResult {
        let operation_id = Uuid::new_v4();
        let section = self.config.section_label();
        let (tree, generation) = {
            let mut state = self.state();
            if state.status == SaveStatus::Pending {
                debug!(%operation_id, section, "save rejected: another save is pending");
                return SaveResult::Rejected;
            }

            state.status = SaveStatus::Pending;
            state.save_generation = state.save_generation.wrapping_add(1);
            (state.tree.clone(), state.save_generation)
        };

        let in_flight = SaveInFlight {
            form: self,
            generation,
        };

        debug!(%operation_id, section, "saving settings");
        let outcome = match self.persister.save(&tree).await {
            Ok(PersistOutcome::Saved) => Ok(()),
            Ok(PersistOutcome::Rejected { message }) => Err(message),
            Err(error) => Err(error.message().to_owned()),
        };

        let result = match outcome {
            Ok(()) => {
                {
                    let mut state = self.state();
                    if state.save_generation == generation {
                        state.status = SaveStatus::Succeeded;
                        state.baseline = tree;
                    }
                }
                let message = format!("{section} have been updated");
                info!(%operation_id, section, "settings saved");
                self.notifications
                    .notify(Notification::success("Settings saved", message.clone()));
                SaveResult::Succeeded { message }
            }
            Err(message) => {
                {
                    let mut state = self.state();
                    if state.save_generation == generation {
                        state.status = SaveStatus::Failed;
                    }
                }
                warn!(%operation_id, section, error = %message, "settings save failed");
                self.notifications.notify(Notification::failure(
                    "Failed to save settings",
                    message.clone(),
                ));
                SaveResult::Failed { message }
            }
        };

        let hold = self.config.notification_hold();
        if !hold.is_zero() {
            tokio::time::sleep(hold).await;
        }

        drop(in_flight);
        result
    }
}
