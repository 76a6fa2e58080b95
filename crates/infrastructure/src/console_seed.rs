//! Fixed datasets that stand in for the platform API in development.

use ledgerdesk_application::{ResourceLabel, ResourceListConfig};
use ledgerdesk_core::{AppError, AppResult};
use ledgerdesk_domain::{AuxFilterDefinition, Entity, ListDefinition, SearchFields, TabSet};
use serde_json::{Value, json};

mod settings_defaults;

#[cfg(test)]
mod tests;

pub use settings_defaults::{
    API_KEY_PATH, business_settings_defaults, platform_settings_defaults,
};

/// List configuration for the tenant businesses screen.
pub fn business_list_config() -> AppResult<ResourceListConfig> {
    Ok(ResourceListConfig::new(
        ResourceLabel::new("business", "businesses")?,
        ListDefinition::new(
            TabSet::new("status", ["active", "trial", "suspended"])?,
            SearchFields::new(["name", "owner.name", "owner.email"])?,
            vec![AuxFilterDefinition::new(
                "plan",
                ["starter", "professional", "enterprise"],
            )?],
        )?,
    ))
}

/// List configuration for the subscriptions screen.
pub fn subscription_list_config() -> AppResult<ResourceListConfig> {
    Ok(ResourceListConfig::new(
        ResourceLabel::new("subscription", "subscriptions")?,
        ListDefinition::new(
            TabSet::new("status", ["active", "past_due", "cancelled"])?,
            SearchFields::new(["business", "email"])?,
            vec![AuxFilterDefinition::new(
                "plan",
                ["starter", "professional", "enterprise"],
            )?],
        )?,
    ))
}

/// List configuration for the support tickets screen.
pub fn ticket_list_config() -> AppResult<ResourceListConfig> {
    Ok(ResourceListConfig::new(
        ResourceLabel::new("ticket", "tickets")?,
        ListDefinition::new(
            TabSet::new("status", ["open", "in_progress", "resolved"])?,
            SearchFields::new(["subject", "business", "id"])?,
            vec![AuxFilterDefinition::new(
                "priority",
                ["low", "medium", "high", "urgent"],
            )?],
        )?,
    ))
}

/// Tenant businesses with owner contact and monthly revenue.
pub fn business_seed() -> AppResult<Vec<Entity>> {
    entities_from_json(json!([
        {
            "id": "1", "name": "Acme Corporation", "status": "active", "plan": "professional",
            "owner": {"name": "John Smith", "email": "john@acme.com"},
            "users": 24, "monthlyRevenue": 299.0, "createdAt": "2024-01-15"
        },
        {
            "id": "2", "name": "TechStart Inc", "status": "active", "plan": "enterprise",
            "owner": {"name": "Sarah Johnson", "email": "sarah@techstart.io"},
            "users": 156, "monthlyRevenue": 999.0, "createdAt": "2023-11-20"
        },
        {
            "id": "3", "name": "Local Bakery", "status": "trial", "plan": "starter",
            "owner": {"name": "Mike Brown", "email": "mike@localbakery.com"},
            "users": 3, "monthlyRevenue": 0.0, "createdAt": "2024-03-01"
        },
        {
            "id": "4", "name": "Global Logistics", "status": "suspended", "plan": "professional",
            "owner": {"name": "Emily Davis", "email": "emily@globallogistics.com"},
            "users": 45, "monthlyRevenue": 299.0, "createdAt": "2023-08-10"
        },
        {
            "id": "5", "name": "Creative Agency", "status": "active", "plan": "professional",
            "owner": {"name": "Alex Wilson", "email": "alex@creativeagency.co"},
            "users": 18, "monthlyRevenue": 299.0, "createdAt": "2024-02-05"
        },
        {
            "id": "6", "name": "Health Clinic", "status": "trial", "plan": "enterprise",
            "owner": {"name": "Dr. Lisa Chen", "email": "lisa@healthclinic.org"},
            "users": 12, "monthlyRevenue": 0.0, "createdAt": "2024-03-10"
        }
    ]))
}

/// Billing subscriptions with monthly recurring revenue.
pub fn subscription_seed() -> AppResult<Vec<Entity>> {
    entities_from_json(json!([
        {
            "id": "sub_1", "business": "Acme Corporation", "email": "billing@acme.com",
            "plan": "professional", "status": "active", "mrr": 299.0,
            "nextBilling": "2024-04-15"
        },
        {
            "id": "sub_2", "business": "TechStart Inc", "email": "finance@techstart.io",
            "plan": "enterprise", "status": "active", "mrr": 999.0,
            "nextBilling": "2024-04-20"
        },
        {
            "id": "sub_3", "business": "Global Logistics", "email": "ap@globallogistics.com",
            "plan": "professional", "status": "past_due", "mrr": 299.0,
            "nextBilling": "2024-03-10"
        },
        {
            "id": "sub_4", "business": "Creative Agency", "email": "alex@creativeagency.co",
            "plan": "professional", "status": "active", "mrr": 299.0,
            "nextBilling": "2024-04-05"
        },
        {
            "id": "sub_5", "business": "Old Retail Co", "email": "owner@oldretail.com",
            "plan": "starter", "status": "cancelled", "mrr": 0.0,
            "nextBilling": null
        }
    ]))
}

/// Support tickets raised by tenants.
pub fn ticket_seed() -> AppResult<Vec<Entity>> {
    entities_from_json(json!([
        {
            "id": "TKT-001", "subject": "Cannot send invoices to customers",
            "business": "Acme Corporation", "status": "open", "priority": "high",
            "createdAt": "2024-03-15T10:30:00Z"
        },
        {
            "id": "TKT-002", "subject": "Payment gateway integration question",
            "business": "TechStart Inc", "status": "in_progress", "priority": "medium",
            "createdAt": "2024-03-14T14:20:00Z"
        },
        {
            "id": "TKT-003", "subject": "Request for custom invoice template",
            "business": "Creative Agency", "status": "open", "priority": "low",
            "createdAt": "2024-03-14T09:15:00Z"
        },
        {
            "id": "TKT-004", "subject": "Account suspended unexpectedly",
            "business": "Global Logistics", "status": "open", "priority": "urgent",
            "createdAt": "2024-03-13T16:45:00Z"
        },
        {
            "id": "TKT-005", "subject": "How to export financial reports",
            "business": "Local Bakery", "status": "resolved", "priority": "low",
            "createdAt": "2024-03-12T11:00:00Z"
        }
    ]))
}

/// Turns a JSON array of objects carrying an `id` into entities.
pub fn entities_from_json(value: Value) -> AppResult<Vec<Entity>> {
    let Value::Array(items) = value else {
        return Err(AppError::Validation(
            "seed data must be a JSON array".to_owned(),
        ));
    };

    items
        .into_iter()
        .map(|item| {
            let id = match item.get("id") {
                Some(Value::String(id)) => id.clone(),
                Some(Value::Number(id)) => id.to_string(),
                _ => {
                    return Err(AppError::Validation(
                        "seed entity is missing a string or numeric id".to_owned(),
                    ));
                }
            };
            Entity::new(id, item)
        })
        .collect()
}
