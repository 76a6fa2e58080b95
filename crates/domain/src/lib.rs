//! Domain types for admin resource lists and settings forms.

#![forbid(unsafe_code)]

mod entity;
mod listing;
mod notification;
mod settings;
mod toggle;

pub use entity::{Entity, EntityId};
pub use listing::{AuxFilterDefinition, FilterState, ListDefinition, SearchFields, TabKey, TabSet};
pub use notification::{Notification, NotificationVariant};
pub use settings::{KeyPath, PathSegment, Scalar, SettingsTree, SettingsValue};
pub use toggle::{EmailNotificationToggle, PlatformAlertToggle, SettingsToggle};
