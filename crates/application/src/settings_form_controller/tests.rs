use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::{Mutex, Notify};

use ledgerdesk_core::{AppError, AppResult};
use ledgerdesk_domain::{
    EmailNotificationToggle, KeyPath, Notification, NotificationVariant, Scalar, SettingsToggle,
    SettingsTree,
};

use crate::console_ports::{NotificationSink, PersistOutcome, SecretGenerator, SettingsPersister};

use super::secrets::secret_fingerprint;
use super::{SaveResult, SaveStatus, SettingsFormConfig, SettingsFormController};

enum PersistBehavior {
    Save,
    Reject(&'static str),
    Fail(&'static str),
}

struct FakeSettingsPersister {
    payloads: Mutex<Vec<Value>>,
    behavior: PersistBehavior,
    gate: Option<Arc<Notify>>,
}

impl FakeSettingsPersister {
    fn new(behavior: PersistBehavior) -> Self {
        Self {
            payloads: Mutex::new(Vec::new()),
            behavior,
            gate: None,
        }
    }

    fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(PersistBehavior::Save)
        }
    }
}

#[async_trait]
impl SettingsPersister for FakeSettingsPersister {
    async fn save(&self, tree: &SettingsTree) -> AppResult<PersistOutcome> {
        self.payloads.lock().await.push(tree.to_json());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match self.behavior {
            PersistBehavior::Save => Ok(PersistOutcome::Saved),
            PersistBehavior::Reject(message) => Ok(PersistOutcome::Rejected {
                message: message.to_owned(),
            }),
            PersistBehavior::Fail(message) => Err(AppError::Unavailable(message.to_owned())),
        }
    }
}

#[derive(Default)]
struct RecordingNotificationSink {
    notifications: StdMutex<Vec<Notification>>,
}

impl RecordingNotificationSink {
    fn recorded(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(|_| panic!("test"))
            .clone()
    }
}

impl NotificationSink for RecordingNotificationSink {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(|_| panic!("test"))
            .push(notification);
    }
}

struct QueuedSecretGenerator {
    values: StdMutex<VecDeque<String>>,
}

impl QueuedSecretGenerator {
    fn new(values: &[&str]) -> Self {
        Self {
            values: StdMutex::new(values.iter().map(|value| (*value).to_owned()).collect()),
        }
    }
}

impl SecretGenerator for QueuedSecretGenerator {
    fn generate(&self) -> AppResult<String> {
        self.values
            .lock()
            .unwrap_or_else(|_| panic!("test"))
            .pop_front()
            .ok_or_else(|| AppError::Internal("no secrets left".to_owned()))
    }
}

fn path(raw: &str) -> KeyPath {
    raw.parse().unwrap_or_else(|_| panic!("test"))
}

fn defaults() -> SettingsTree {
    SettingsTree::from_json(&json!({
        "general": {"businessName": "Acme", "currency": "USD"},
        "invoiceSettings": {
            "lateFeeEnabled": false,
            "lateFeePercentage": 5,
            "reminderDays": [7, 3, 1]
        },
        "emailNotifications": {"newInvoice": true, "paymentReceived": false},
        "api": {"apiKey": "sk_live_old", "webhookUrl": ""}
    }))
    .unwrap_or_else(|_| panic!("test"))
}

fn form_with(
    persister: Arc<FakeSettingsPersister>,
    config: SettingsFormConfig,
) -> (SettingsFormController, Arc<RecordingNotificationSink>) {
    let notifications = Arc::new(RecordingNotificationSink::default());
    let form = SettingsFormController::new(config, persister, notifications.clone());
    form.initialize(defaults())
        .unwrap_or_else(|_| panic!("test"));
    (form, notifications)
}

fn general_config() -> SettingsFormConfig {
    SettingsFormConfig::new("General settings").unwrap_or_else(|_| panic!("test"))
}

#[test]
fn nested_update_keeps_sibling_sections_identical() {
    let (form, _) = form_with(
        Arc::new(FakeSettingsPersister::new(PersistBehavior::Save)),
        general_config(),
    );
    let general_before = form.value(&path("general")).unwrap_or_else(|| panic!("test"));

    form.update(&path("invoiceSettings.lateFeeEnabled"), true)
        .unwrap_or_else(|_| panic!("test"));

    let general_after = form.value(&path("general")).unwrap_or_else(|| panic!("test"));
    assert!(general_before.same_node(&general_after));
    assert_eq!(
        form.tree().scalar(&path("invoiceSettings.lateFeePercentage")),
        Some(Scalar::Integer(5))
    );
    assert_eq!(
        form.tree().scalar(&path("invoiceSettings.lateFeeEnabled")),
        Some(Scalar::Bool(true))
    );
    assert!(form.has_unsaved_changes());
}

#[test]
fn invalid_update_leaves_tree_untouched() {
    let (form, _) = form_with(
        Arc::new(FakeSettingsPersister::new(PersistBehavior::Save)),
        general_config(),
    );
    let before = form.tree();

    let result = form.update(&path("general.currency.code"), "EUR");

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(form.tree().ptr_eq(&before));
    assert!(!form.has_unsaved_changes());
}

#[test]
fn array_element_update_is_scoped() {
    let (form, _) = form_with(
        Arc::new(FakeSettingsPersister::new(PersistBehavior::Save)),
        general_config(),
    );

    form.update(&path("invoiceSettings.reminderDays[0]"), 14_i64)
        .unwrap_or_else(|_| panic!("test"));

    assert_eq!(
        form.tree().to_json()["invoiceSettings"]["reminderDays"],
        json!([14, 3, 1])
    );
}

#[test]
fn initialize_twice_is_a_conflict() {
    let (form, _) = form_with(
        Arc::new(FakeSettingsPersister::new(PersistBehavior::Save)),
        general_config(),
    );

    assert!(matches!(
        form.initialize(SettingsTree::new()),
        Err(AppError::Conflict(_))
    ));
}

#[test]
fn reset_discards_edits_and_visibility() {
    let (form, _) = form_with(
        Arc::new(FakeSettingsPersister::new(PersistBehavior::Save)),
        general_config(),
    );
    form.update(&path("general.currency"), "EUR")
        .unwrap_or_else(|_| panic!("test"));
    assert!(form.toggle_secret_visibility(&path("api.apiKey")));

    form.reset(defaults());

    assert_eq!(
        form.tree().scalar(&path("general.currency")),
        Some(Scalar::Text("USD".to_owned()))
    );
    assert!(!form.is_secret_visible(&path("api.apiKey")));
    assert!(!form.has_unsaved_changes());
}

#[test]
fn toggles_read_and_write_catalog_keys() {
    let (form, _) = form_with(
        Arc::new(FakeSettingsPersister::new(PersistBehavior::Save)),
        general_config(),
    );

    form.set_toggle(EmailNotificationToggle::InvoiceOverdue, true)
        .unwrap_or_else(|_| panic!("test"));
    form.set_toggle(EmailNotificationToggle::NewInvoice, false)
        .unwrap_or_else(|_| panic!("test"));

    let states = form.toggle_states::<EmailNotificationToggle>();
    assert_eq!(states.len(), EmailNotificationToggle::all().len());
    assert_eq!(
        states,
        vec![
            (EmailNotificationToggle::NewInvoice, false),
            (EmailNotificationToggle::PaymentReceived, false),
            (EmailNotificationToggle::InvoiceOverdue, true),
            (EmailNotificationToggle::WeeklySummary, false),
            (EmailNotificationToggle::NewCustomer, false),
        ]
    );
}

#[tokio::test]
async fn successful_save_reports_section_and_returns_to_idle() {
    let persister = Arc::new(FakeSettingsPersister::new(PersistBehavior::Save));
    let (form, notifications) = form_with(persister.clone(), general_config());
    form.update(&path("general.businessName"), "Acme Holdings")
        .unwrap_or_else(|_| panic!("test"));

    let result = form.save().await;

    assert_eq!(
        result,
        SaveResult::Succeeded {
            message: "General settings have been updated".to_owned()
        }
    );
    assert_eq!(form.save_status(), SaveStatus::Idle);
    assert!(!form.has_unsaved_changes());

    let payloads = persister.payloads.lock().await;
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0]["general"]["businessName"], json!("Acme Holdings"));

    let recorded = notifications.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].variant, NotificationVariant::Default);
    assert_eq!(recorded[0].description, "General settings have been updated");
}

#[tokio::test]
async fn rejected_save_notifies_once_and_returns_to_idle() {
    let persister = Arc::new(FakeSettingsPersister::new(PersistBehavior::Reject(
        "network error",
    )));
    let (form, notifications) = form_with(persister, general_config());
    form.update(&path("general.currency"), "EUR")
        .unwrap_or_else(|_| panic!("test"));

    let result = form.save().await;

    assert_eq!(
        result,
        SaveResult::Failed {
            message: "network error".to_owned()
        }
    );
    assert_eq!(form.save_status(), SaveStatus::Idle);
    assert!(form.has_unsaved_changes());

    let recorded = notifications.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].variant, NotificationVariant::Destructive);
    assert_eq!(recorded[0].description, "network error");
}

#[tokio::test]
async fn persister_error_becomes_failed_result() {
    let persister = Arc::new(FakeSettingsPersister::new(PersistBehavior::Fail(
        "settings service is down",
    )));
    let (form, notifications) = form_with(persister, general_config());

    let result = form.save().await;

    assert_eq!(
        result,
        SaveResult::Failed {
            message: "settings service is down".to_owned()
        }
    );
    assert_eq!(notifications.recorded().len(), 1);
}

#[tokio::test]
async fn concurrent_save_is_rejected_without_second_submission() {
    let gate = Arc::new(Notify::new());
    let persister = Arc::new(FakeSettingsPersister::gated(gate.clone()));
    let (form, notifications) = form_with(persister.clone(), general_config());

    let first = form.save();
    let second = async {
        tokio::task::yield_now().await;
        assert_eq!(form.save_status(), SaveStatus::Pending);
        let rejected = form.save().await;
        gate.notify_one();
        rejected
    };
    let (first, second) = tokio::join!(first, second);

    assert!(matches!(first, SaveResult::Succeeded { .. }));
    assert_eq!(second, SaveResult::Rejected);
    assert_eq!(persister.payloads.lock().await.len(), 1);
    assert_eq!(notifications.recorded().len(), 1);
    assert_eq!(form.save_status(), SaveStatus::Idle);
}

#[tokio::test]
async fn edits_made_while_saving_stay_unsaved() {
    let gate = Arc::new(Notify::new());
    let persister = Arc::new(FakeSettingsPersister::gated(gate.clone()));
    let (form, _) = form_with(persister.clone(), general_config());

    let save = form.save();
    let edit = async {
        tokio::task::yield_now().await;
        form.update(&path("general.currency"), "GBP")
            .unwrap_or_else(|_| panic!("test"));
        gate.notify_one();
    };
    let (result, ()) = tokio::join!(save, edit);

    assert!(matches!(result, SaveResult::Succeeded { .. }));
    assert_eq!(
        persister.payloads.lock().await[0]["general"]["currency"],
        json!("USD")
    );
    assert!(form.has_unsaved_changes());
}

#[tokio::test]
async fn cancelled_save_returns_form_to_idle() {
    let gate = Arc::new(Notify::new());
    let persister = Arc::new(FakeSettingsPersister::gated(gate.clone()));
    let (form, notifications) = form_with(persister.clone(), general_config());
    form.update(&path("general.currency"), "EUR")
        .unwrap_or_else(|_| panic!("test"));

    let timed_out = tokio::time::timeout(Duration::from_millis(10), form.save()).await;

    assert!(timed_out.is_err());
    assert_eq!(form.save_status(), SaveStatus::Idle);
    assert!(form.has_unsaved_changes());
    assert!(notifications.recorded().is_empty());

    gate.notify_one();
    let retried = form.save().await;

    assert!(matches!(retried, SaveResult::Succeeded { .. }));
    assert_eq!(persister.payloads.lock().await.len(), 2);
    assert!(!form.has_unsaved_changes());
    assert_eq!(notifications.recorded().len(), 1);
}

#[tokio::test]
async fn reset_during_pending_save_releases_the_form() {
    let gate = Arc::new(Notify::new());
    let persister = Arc::new(FakeSettingsPersister::gated(gate.clone()));
    let (form, notifications) = form_with(persister.clone(), general_config());
    form.update(&path("general.currency"), "EUR")
        .unwrap_or_else(|_| panic!("test"));

    let save = form.save();
    let reset = async {
        tokio::task::yield_now().await;
        assert_eq!(form.save_status(), SaveStatus::Pending);
        form.reset(defaults());
        assert_eq!(form.save_status(), SaveStatus::Idle);
        gate.notify_one();
    };
    let (result, ()) = tokio::join!(save, reset);

    assert!(matches!(result, SaveResult::Succeeded { .. }));
    assert_eq!(notifications.recorded().len(), 1);
    assert_eq!(form.save_status(), SaveStatus::Idle);
    assert_eq!(
        form.tree().scalar(&path("general.currency")),
        Some(Scalar::Text("USD".to_owned()))
    );
    assert!(!form.has_unsaved_changes());
}

#[tokio::test]
async fn terminal_status_is_held_before_idle() {
    let persister = Arc::new(FakeSettingsPersister::new(PersistBehavior::Save));
    let (form, _) = form_with(
        persister,
        general_config().with_notification_hold(Duration::from_millis(40)),
    );

    let save = form.save();
    let observe = async {
        let mut seen = Vec::new();
        for _ in 0..20 {
            let status = form.save_status();
            if seen.last() != Some(&status) {
                seen.push(status);
            }
            if status == SaveStatus::Succeeded {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        seen
    };
    let (result, seen) = tokio::join!(save, observe);

    assert!(matches!(result, SaveResult::Succeeded { .. }));
    assert_eq!(seen.last(), Some(&SaveStatus::Succeeded));
    assert_eq!(form.save_status(), SaveStatus::Idle);
}

#[tokio::test]
async fn visibility_state_is_never_persisted() {
    let persister = Arc::new(FakeSettingsPersister::new(PersistBehavior::Save));
    let (form, _) = form_with(persister.clone(), general_config());

    assert!(form.toggle_secret_visibility(&path("api.apiKey")));
    assert!(form.is_secret_visible(&path("api.apiKey")));
    form.save().await;

    let payloads = persister.payloads.lock().await;
    assert_eq!(payloads[0], defaults().to_json());
    assert!(form.is_secret_visible(&path("api.apiKey")));
    assert!(!form.toggle_secret_visibility(&path("api.apiKey")));
}

#[test]
fn regenerated_secret_replaces_leaf_without_echoing_old_value() {
    let notifications = Arc::new(RecordingNotificationSink::default());
    let form = SettingsFormController::new(
        general_config(),
        Arc::new(FakeSettingsPersister::new(PersistBehavior::Save)),
        notifications.clone(),
    )
    .with_secret_generator(Arc::new(QueuedSecretGenerator::new(&[
        "sk_live_4f9c2a7e1b3d",
    ])));
    form.initialize(defaults())
        .unwrap_or_else(|_| panic!("test"));

    let secret = form
        .regenerate_secret(&path("api.apiKey"), "API key")
        .unwrap_or_else(|_| panic!("test"));

    assert!(secret.starts_with("sk_live_"));
    assert_ne!(secret, "sk_live_old");
    assert_eq!(
        form.tree().scalar(&path("api.apiKey")),
        Some(Scalar::Text(secret.clone()))
    );

    let recorded = notifications.recorded();
    assert_eq!(recorded.len(), 1);
    assert!(!recorded[0].title.contains("sk_live_old"));
    assert!(!recorded[0].description.contains("sk_live_old"));
    assert!(!recorded[0].description.contains(secret.as_str()));
}

#[test]
fn regeneration_retries_when_generator_repeats_old_value() {
    let form = SettingsFormController::new(
        general_config(),
        Arc::new(FakeSettingsPersister::new(PersistBehavior::Save)),
        Arc::new(RecordingNotificationSink::default()),
    )
    .with_secret_generator(Arc::new(QueuedSecretGenerator::new(&[
        "sk_live_old",
        "sk_live_fresh",
    ])));
    form.initialize(defaults())
        .unwrap_or_else(|_| panic!("test"));

    let secret = form
        .regenerate_secret(&path("api.apiKey"), "API key")
        .unwrap_or_else(|_| panic!("test"));

    assert_eq!(secret, "sk_live_fresh");
}

#[test]
fn regeneration_requires_a_generator() {
    let (form, notifications) = form_with(
        Arc::new(FakeSettingsPersister::new(PersistBehavior::Save)),
        general_config(),
    );

    assert!(form.regenerate_secret(&path("api.apiKey"), "API key").is_err());
    assert!(notifications.recorded().is_empty());
}

#[test]
fn fingerprint_is_short_and_stable() {
    let fingerprint = secret_fingerprint("sk_live_4f9c2a7e1b3d");
    assert_eq!(fingerprint.len(), 12);
    assert_eq!(fingerprint, secret_fingerprint("sk_live_4f9c2a7e1b3d"));
    assert_ne!(fingerprint, secret_fingerprint("sk_live_old"));
}
