use std::str::FromStr;

use ledgerdesk_core::AppError;

use crate::settings::KeyPath;

/// A boolean switch rendered in a settings toggle list.
///
/// Implementors are closed enumerations, so the set of switches a form can
/// render or write is fixed at compile time.
pub trait SettingsToggle: Copy + Sized + 'static {
    /// Section holding the switches.
    fn section() -> &'static str;

    /// Key of this switch inside its section.
    fn key(&self) -> &'static str;

    /// Human-readable label.
    fn label(&self) -> &'static str;

    /// One-line help text.
    fn description(&self) -> &'static str;

    /// Every switch of the section in display order.
    fn all() -> &'static [Self];

    /// Location of this switch in a settings tree.
    fn key_path(&self) -> KeyPath {
        KeyPath::section_key(Self::section(), self.key())
    }
}

/// Email notification preferences of a business account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailNotificationToggle {
    /// An invoice was created.
    NewInvoice,
    /// A customer paid an invoice.
    PaymentReceived,
    /// An invoice passed its due date.
    InvoiceOverdue,
    /// Weekly digest of activity.
    WeeklySummary,
    /// A customer was added.
    NewCustomer,
}

impl SettingsToggle for EmailNotificationToggle {
    fn section() -> &'static str {
        "emailNotifications"
    }

    fn key(&self) -> &'static str {
        match self {
            Self::NewInvoice => "newInvoice",
            Self::PaymentReceived => "paymentReceived",
            Self::InvoiceOverdue => "invoiceOverdue",
            Self::WeeklySummary => "weeklySummary",
            Self::NewCustomer => "newCustomer",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::NewInvoice => "New invoice",
            Self::PaymentReceived => "Payment received",
            Self::InvoiceOverdue => "Invoice overdue",
            Self::WeeklySummary => "Weekly summary",
            Self::NewCustomer => "New customer",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::NewInvoice => "Email me when an invoice is created",
            Self::PaymentReceived => "Email me when a payment is received",
            Self::InvoiceOverdue => "Email me when an invoice becomes overdue",
            Self::WeeklySummary => "Send a weekly summary of account activity",
            Self::NewCustomer => "Email me when a customer is added",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::NewInvoice,
            Self::PaymentReceived,
            Self::InvoiceOverdue,
            Self::WeeklySummary,
            Self::NewCustomer,
        ]
    }
}

/// Platform-wide alerts configured by super admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformAlertToggle {
    /// A business signed up.
    NewBusinessSignup,
    /// A subscription payment failed.
    FailedPayment,
    /// A support ticket was opened.
    SupportTicket,
    /// Platform health degraded.
    SystemHealth,
}

impl SettingsToggle for PlatformAlertToggle {
    fn section() -> &'static str {
        "notifications"
    }

    fn key(&self) -> &'static str {
        match self {
            Self::NewBusinessSignup => "newBusinessSignup",
            Self::FailedPayment => "failedPayment",
            Self::SupportTicket => "supportTicket",
            Self::SystemHealth => "systemHealth",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::NewBusinessSignup => "New business signups",
            Self::FailedPayment => "Failed payments",
            Self::SupportTicket => "Support tickets",
            Self::SystemHealth => "System health alerts",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::NewBusinessSignup => "Notify admins when a new business registers",
            Self::FailedPayment => "Notify admins when a subscription payment fails",
            Self::SupportTicket => "Notify admins when a support ticket is opened",
            Self::SystemHealth => "Notify admins when platform health degrades",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::NewBusinessSignup,
            Self::FailedPayment,
            Self::SupportTicket,
            Self::SystemHealth,
        ]
    }
}

impl FromStr for EmailNotificationToggle {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|toggle| toggle.key() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown email notification '{value}'")))
    }
}

impl FromStr for PlatformAlertToggle {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|toggle| toggle.key() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown platform alert '{value}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_paths_live_under_their_section() {
        assert_eq!(
            EmailNotificationToggle::InvoiceOverdue
                .key_path()
                .to_string(),
            "emailNotifications.invoiceOverdue"
        );
        assert_eq!(
            PlatformAlertToggle::SystemHealth.key_path().to_string(),
            "notifications.systemHealth"
        );
    }

    #[test]
    fn toggle_keys_parse_back() {
        for toggle in EmailNotificationToggle::all() {
            assert_eq!(
                toggle.key().parse::<EmailNotificationToggle>().ok(),
                Some(*toggle)
            );
        }
        assert!("newInvoices".parse::<EmailNotificationToggle>().is_err());
    }
}
