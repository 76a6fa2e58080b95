mod action_executor;
mod notification_sink;
mod secret_generator;
mod settings_persister;

pub use action_executor::{ActionExecutor, ActionName, ActionOutcome, ActionRequest, ActionScope};
pub use notification_sink::NotificationSink;
pub use secret_generator::SecretGenerator;
pub use settings_persister::{PersistOutcome, SettingsPersister};
