//! Infrastructure adapters for Ledgerdesk.

#![forbid(unsafe_code)]

mod console_seed;
mod random_secret_generator;
mod simulated_action_executor;
mod simulated_settings_persister;
mod tracing_notification_sink;

pub use console_seed::{
    API_KEY_PATH, business_list_config, business_seed, business_settings_defaults,
    entities_from_json, platform_settings_defaults, subscription_list_config, subscription_seed,
    ticket_list_config, ticket_seed,
};
pub use random_secret_generator::RandomSecretGenerator;
pub use simulated_action_executor::SimulatedActionExecutor;
pub use simulated_settings_persister::SimulatedSettingsPersister;
pub use tracing_notification_sink::TracingNotificationSink;
