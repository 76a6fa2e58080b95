//! Application controllers and ports for admin list consoles and settings
//! forms.

#![forbid(unsafe_code)]

mod console_ports;
mod resource_list_controller;
mod settings_form_controller;

pub use console_ports::{
    ActionExecutor, ActionName, ActionOutcome, ActionRequest, ActionScope, NotificationSink,
    PersistOutcome, SecretGenerator, SettingsPersister,
};
pub use resource_list_controller::{
    ActionResult, ActionSkipReason, ListSummary, ResourceLabel, ResourceListConfig,
    ResourceListController,
};
pub use settings_form_controller::{
    SaveResult, SaveStatus, SettingsFormConfig, SettingsFormController,
};
