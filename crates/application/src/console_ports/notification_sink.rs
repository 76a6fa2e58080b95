use ledgerdesk_domain::Notification;

/// Fire-and-forget surface for user-visible toasts.
pub trait NotificationSink: Send + Sync {
    /// Displays one notification.
    fn notify(&self, notification: Notification);
}
