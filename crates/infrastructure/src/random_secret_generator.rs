use std::fmt::Write;

use ledgerdesk_application::SecretGenerator;
use ledgerdesk_core::{AppError, AppResult, NonEmptyString};

const SECRET_BYTES: usize = 24;

/// Generates `<prefix><48 hex chars>` secrets from the OS random source.
#[derive(Debug, Clone)]
pub struct RandomSecretGenerator {
    prefix: NonEmptyString,
}

impl RandomSecretGenerator {
    /// Creates a generator emitting secrets that start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            prefix: NonEmptyString::new(prefix)?,
        })
    }

    /// Generator for live API keys (`sk_live_...`).
    pub fn live_api_keys() -> AppResult<Self> {
        Self::new("sk_live_")
    }

    /// Returns whether `value` has this generator's format.
    #[must_use]
    pub fn matches_format(&self, value: &str) -> bool {
        value.strip_prefix(self.prefix.as_str()).is_some_and(|rest| {
            rest.len() == SECRET_BYTES * 2
                && rest
                    .chars()
                    .all(|character| matches!(character, '0'..='9' | 'a'..='f'))
        })
    }
}

impl SecretGenerator for RandomSecretGenerator {
    fn generate(&self) -> AppResult<String> {
        let mut bytes = [0u8; SECRET_BYTES];
        getrandom::fill(&mut bytes)
            .map_err(|error| AppError::Internal(format!("failed to generate secret: {error}")))?;

        let mut secret = String::with_capacity(self.prefix.as_str().len() + SECRET_BYTES * 2);
        secret.push_str(self.prefix.as_str());
        Ok(bytes.iter().fold(secret, |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        }))
    }
}
