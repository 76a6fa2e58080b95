//! Ledgerdesk admin console runtime.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use ledgerdesk_application::{
    ActionName, ActionResult, NotificationSink, ResourceListController, SaveResult,
    SettingsFormConfig, SettingsFormController,
};
use ledgerdesk_core::{AppError, AppResult};
use ledgerdesk_domain::{EmailNotificationToggle, EntityId, KeyPath, SettingsToggle};
use ledgerdesk_infrastructure::{
    API_KEY_PATH, RandomSecretGenerator, SimulatedActionExecutor, SimulatedSettingsPersister,
    TracingNotificationSink, business_list_config, business_seed, business_settings_defaults,
    ticket_list_config, ticket_seed,
};

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ConsoleConfig {
    action_delay_ms: u64,
    save_delay_ms: u64,
    notification_hold_ms: u64,
    failing_actions: Vec<String>,
    save_failure: Option<String>,
}

#[derive(Debug, Serialize)]
struct ActionReport {
    action: String,
    status: &'static str,
    affected_count: Option<usize>,
    error: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    info!(
        action_delay_ms = config.action_delay_ms,
        save_delay_ms = config.save_delay_ms,
        notification_hold_ms = config.notification_hold_ms,
        failing_actions = ?config.failing_actions,
        "ledgerdesk-console started"
    );

    let notifications: Arc<dyn NotificationSink> = Arc::new(TracingNotificationSink::new());
    let executor = Arc::new(
        SimulatedActionExecutor::new(Duration::from_millis(config.action_delay_ms))
            .with_failing_actions(&config.failing_actions),
    );

    let businesses = run_business_list(executor.clone(), notifications.clone()).await?;
    let settings = run_business_settings(&config, notifications.clone()).await?;
    let tickets = run_ticket_list(executor, notifications)?;

    let report = json!({
        "businesses": businesses,
        "settings": settings,
        "tickets": tickets,
    });
    let rendered = serde_json::to_string_pretty(&report)
        .map_err(|error| AppError::Internal(format!("failed to render report: {error}")))?;
    println!("{rendered}");

    Ok(())
}

async fn run_business_list(
    executor: Arc<SimulatedActionExecutor>,
    notifications: Arc<dyn NotificationSink>,
) -> AppResult<Value> {
    let controller = ResourceListController::new(business_list_config()?, executor, notifications);
    controller.set_entities(business_seed()?);

    controller.set_query("acme");
    let search_hits = ids_of(&controller);
    controller.set_query("");

    if !controller.set_tab("active") {
        warn!("active tab is not declared for businesses");
    }
    controller.select_all();
    let selected_before_suspend = controller.selected_count();
    let bulk = controller
        .dispatch_bulk_action(&ActionName::new("Suspend")?)
        .await;

    controller.set_tab("all");
    let single = controller
        .dispatch_action(&ActionName::new("Verify")?, &EntityId::from("3"))
        .await;

    Ok(json!({
        "search_hits": search_hits,
        "selected_before_suspend": selected_before_suspend,
        "bulk_action": action_report(&bulk),
        "single_action": action_report(&single),
        "monthly_revenue": controller.numeric_total("monthlyRevenue"),
        "summary": to_value(&controller.summary())?,
    }))
}

async fn run_business_settings(
    config: &ConsoleConfig,
    notifications: Arc<dyn NotificationSink>,
) -> AppResult<Value> {
    let mut persister =
        SimulatedSettingsPersister::new(Duration::from_millis(config.save_delay_ms));
    if let Some(message) = &config.save_failure {
        persister = persister.rejecting(message.clone());
    }
    let persister = Arc::new(persister);

    let form = SettingsFormController::new(
        SettingsFormConfig::new("Business settings")?
            .with_notification_hold(Duration::from_millis(config.notification_hold_ms)),
        persister.clone(),
        notifications,
    )
    .with_secret_generator(Arc::new(RandomSecretGenerator::live_api_keys()?));
    form.initialize(business_settings_defaults()?)?;

    form.update(&"invoiceSettings.lateFeeEnabled".parse()?, true)?;
    form.update(&"general.currency".parse()?, "EUR")?;
    form.set_toggle(EmailNotificationToggle::WeeklySummary, true)?;

    let api_key_path: KeyPath = API_KEY_PATH.parse()?;
    form.regenerate_secret(&api_key_path, "API key")?;
    let unsaved_before_save = form.has_unsaved_changes();

    let save = match form.save().await {
        SaveResult::Succeeded { message } => json!({"status": "succeeded", "message": message}),
        SaveResult::Failed { message } => json!({"status": "failed", "message": message}),
        SaveResult::Rejected => json!({"status": "rejected"}),
    };

    let toggles: serde_json::Map<String, Value> = form
        .toggle_states::<EmailNotificationToggle>()
        .into_iter()
        .map(|(toggle, enabled)| (toggle.label().to_owned(), Value::Bool(enabled)))
        .collect();

    Ok(json!({
        "unsaved_before_save": unsaved_before_save,
        "save": save,
        "status_after_save": form.save_status().as_str(),
        "email_notifications": toggles,
        "persisted": persister.last_saved().await,
    }))
}

fn run_ticket_list(
    executor: Arc<SimulatedActionExecutor>,
    notifications: Arc<dyn NotificationSink>,
) -> AppResult<Value> {
    let controller = ResourceListController::new(ticket_list_config()?, executor, notifications);
    controller.set_entities(ticket_seed()?);

    controller.set_tab("open");
    controller.set_aux_filter("priority", Some("urgent"));
    let urgent_open = ids_of(&controller);

    Ok(json!({
        "urgent_open": urgent_open,
        "summary": to_value(&controller.summary())?,
    }))
}

fn ids_of(controller: &ResourceListController) -> Vec<String> {
    controller
        .filtered_view()
        .iter()
        .map(|entity| entity.id().to_string())
        .collect()
}

fn action_report(result: &ActionResult) -> ActionReport {
    match result {
        ActionResult::Completed {
            action,
            affected_count,
        } => ActionReport {
            action: action.to_string(),
            status: "completed",
            affected_count: Some(*affected_count),
            error: None,
        },
        ActionResult::Failed { action, error } => ActionReport {
            action: action.to_string(),
            status: "failed",
            affected_count: None,
            error: Some(error.to_string()),
        },
        ActionResult::Skipped(reason) => ActionReport {
            action: String::new(),
            status: "skipped",
            affected_count: None,
            error: Some(format!("{reason:?}")),
        },
    }
}

fn to_value<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value)
        .map_err(|error| AppError::Internal(format!("failed to serialize view state: {error}")))
}

impl ConsoleConfig {
    fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let failing_actions = lookup("CONSOLE_FAILING_ACTIONS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|action| !action.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        let save_failure = lookup("CONSOLE_SAVE_FAILURE")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Ok(Self {
            action_delay_ms: parse_u64(&lookup, "CONSOLE_ACTION_DELAY_MS", 150)?,
            save_delay_ms: parse_u64(&lookup, "CONSOLE_SAVE_DELAY_MS", 250)?,
            notification_hold_ms: parse_u64(&lookup, "CONSOLE_NOTIFICATION_HOLD_MS", 0)?,
            failing_actions,
            save_failure,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> AppResult<u64> {
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
