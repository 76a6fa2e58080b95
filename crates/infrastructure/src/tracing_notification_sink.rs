//! Notification sink for development. Logs toasts to tracing output.

use ledgerdesk_application::NotificationSink;
use ledgerdesk_domain::{Notification, NotificationVariant};
use tracing::{info, warn};

/// Development notification sink that logs every toast.
#[derive(Debug, Clone, Default)]
pub struct TracingNotificationSink;

impl TracingNotificationSink {
    /// Creates a new tracing notification sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Default => info!(
                title = %notification.title,
                variant = notification.variant.as_str(),
                issued_at = %notification.issued_at,
                "{}",
                notification.description
            ),
            NotificationVariant::Destructive => warn!(
                title = %notification.title,
                variant = notification.variant.as_str(),
                issued_at = %notification.issued_at,
                "{}",
                notification.description
            ),
        }
    }
}
