use ledgerdesk_core::AppResult;

/// Port producing fresh secret values such as API keys.
pub trait SecretGenerator: Send + Sync {
    /// Returns a newly generated secret in the generator's format.
    fn generate(&self) -> AppResult<String>;
}
