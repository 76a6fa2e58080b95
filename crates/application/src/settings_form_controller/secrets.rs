use std::fmt::Write;

use ledgerdesk_core::{AppError, AppResult};
use ledgerdesk_domain::{KeyPath, Notification, Scalar};
use sha2::{Digest, Sha256};
use tracing::info;

use super::SettingsFormController;

impl SettingsFormController {
    /// Replaces the secret at `path` with a freshly generated value and
    /// returns it.
    ///
    /// The notification names the secret by `label` and never includes the
    /// previous value. Logs carry a fingerprint instead of the secret.
    pub fn regenerate_secret(&self, path: &KeyPath, label: &str) -> AppResult<String> {
        let generator = self.secret_generator.as_ref().ok_or_else(|| {
            AppError::Conflict(format!(
                "{} form has no secret generator configured",
                self.config.section_label()
            ))
        })?;

        let previous = self
            .state()
            .tree
            .scalar(path)
            .as_ref()
            .and_then(Scalar::as_text)
            .map(str::to_owned);

        let mut secret = generator.generate()?;
        if previous.as_deref() == Some(secret.as_str()) {
            secret = generator.generate()?;
            if previous.as_deref() == Some(secret.as_str()) {
                return Err(AppError::Internal(
                    "secret generator repeated the previous value".to_owned(),
                ));
            }
        }

        self.update(path, secret.clone())?;

        info!(
            section = self.config.section_label(),
            path = %path,
            fingerprint = %secret_fingerprint(&secret),
            "secret regenerated"
        );
        self.notifications.notify(Notification::success(
            format!("{label} regenerated"),
            format!("A new {label} has been generated. Save your settings to apply it."),
        ));

        Ok(secret)
    }

    /// Flips whether the secret at `path` is shown in clear text and returns
    /// the new visibility. Visibility is never part of the saved tree.
    pub fn toggle_secret_visibility(&self, path: &KeyPath) -> bool {
        let mut state = self.state();
        if state.visible_secrets.remove(path) {
            return false;
        }

        state.visible_secrets.insert(path.clone());
        true
    }

    /// Returns whether the secret at `path` is shown in clear text.
    #[must_use]
    pub fn is_secret_visible(&self, path: &KeyPath) -> bool {
        self.state().visible_secrets.contains(path)
    }
}

/// Short SHA-256 prefix identifying a secret in logs.
pub(super) fn secret_fingerprint(secret: &str) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    digest
        .iter()
        .take(6)
        .fold(String::with_capacity(12), |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        })
}
