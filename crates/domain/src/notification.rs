use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    /// Informational or success feedback.
    #[default]
    Default,
    /// Failure feedback.
    Destructive,
}

impl NotificationVariant {
    /// Returns the lowercase variant name used as a log field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Destructive => "destructive",
        }
    }
}

/// User-visible toast emitted after an action or save resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Short headline.
    pub title: String,
    /// Longer explanation.
    pub description: String,
    /// Visual weight.
    pub variant: NotificationVariant,
    /// Time the notification was raised.
    pub issued_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a default-variant notification stamped now.
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
            issued_at: Utc::now(),
        }
    }

    /// Creates a destructive notification stamped now.
    #[must_use]
    pub fn failure(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
            issued_at: Utc::now(),
        }
    }

    /// Returns whether this notification reports a failure.
    #[must_use]
    pub fn is_destructive(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}
