use ledgerdesk_core::AppResult;
use ledgerdesk_domain::SettingsTree;
use serde_json::json;

/// Location of the tenant API key inside the business settings tree.
pub const API_KEY_PATH: &str = "integrations.apiKey";

/// Starting values of the business settings form.
pub fn business_settings_defaults() -> AppResult<SettingsTree> {
    SettingsTree::from_json(&json!({
        "general": {
            "businessName": "Acme Corporation",
            "email": "billing@acme.com",
            "phone": "+1 (555) 123-4567",
            "website": "https://acme.com",
            "address": "123 Business Ave, Suite 100",
            "timezone": "America/New_York",
            "currency": "USD"
        },
        "invoiceSettings": {
            "prefix": "INV-",
            "nextNumber": 1001,
            "defaultDueDays": 30,
            "defaultNotes": "Thank you for your business!",
            "lateFeeEnabled": false,
            "lateFeePercentage": 5,
            "reminderDays": [7, 3, 1]
        },
        "emailNotifications": {
            "newInvoice": true,
            "paymentReceived": true,
            "invoiceOverdue": true,
            "weeklySummary": false,
            "newCustomer": true
        },
        "integrations": {
            "apiKey": "sk_live_old",
            "webhookUrl": ""
        }
    }))
}

/// Starting values of the platform-wide settings form.
pub fn platform_settings_defaults() -> AppResult<SettingsTree> {
    SettingsTree::from_json(&json!({
        "general": {
            "platformName": "Ledgerdesk",
            "supportEmail": "support@ledgerdesk.io",
            "maintenanceMode": false,
            "allowSignups": true
        },
        "billing": {
            "trialDays": 14,
            "gracePeriodDays": 7,
            "taxRate": 0.0
        },
        "notifications": {
            "newBusinessSignup": true,
            "failedPayment": true,
            "supportTicket": true,
            "systemHealth": false
        },
        "security": {
            "sessionTimeoutMinutes": 60,
            "requireTwoFactor": false,
            "passwordMinLength": 12
        }
    }))
}
