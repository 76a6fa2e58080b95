use std::collections::BTreeSet;

use ledgerdesk_application::ResourceListConfig;
use ledgerdesk_domain::{
    EmailNotificationToggle, Entity, KeyPath, PlatformAlertToggle, Scalar, SettingsToggle,
    SettingsTree,
};

use super::*;

fn assert_well_formed(config: &ResourceListConfig, entities: &[Entity]) {
    let definition = config.definition();
    let ids: BTreeSet<_> = entities.iter().map(|entity| entity.id().clone()).collect();
    assert_eq!(ids.len(), entities.len(), "duplicate seed ids");

    for entity in entities {
        let status = entity
            .attribute_text(definition.tabs().field())
            .unwrap_or_else(|| panic!("missing tab field on {}", entity.id()));
        assert!(
            definition.tabs().resolve(&status).is_some(),
            "undeclared tab '{status}'"
        );

        for filter in definition.aux_filters() {
            let value = entity
                .attribute_text(filter.field())
                .unwrap_or_else(|| panic!("missing {} on {}", filter.field(), entity.id()));
            assert!(filter.resolve(&value).is_some(), "undeclared value '{value}'");
        }
    }
}

fn assert_toggles_present<T: SettingsToggle>(tree: &SettingsTree) {
    for toggle in T::all() {
        assert!(
            tree.scalar(&toggle.key_path())
                .as_ref()
                .and_then(Scalar::as_bool)
                .is_some(),
            "missing toggle {}",
            toggle.key()
        );
    }
}

#[test]
fn business_seed_is_well_formed() {
    let config = business_list_config().unwrap_or_else(|_| panic!("test"));
    let entities = business_seed().unwrap_or_else(|_| panic!("test"));
    assert_eq!(entities.len(), 6);
    assert_well_formed(&config, &entities);
}

#[test]
fn subscription_seed_is_well_formed() {
    let config = subscription_list_config().unwrap_or_else(|_| panic!("test"));
    let entities = subscription_seed().unwrap_or_else(|_| panic!("test"));
    assert_well_formed(&config, &entities);
}

#[test]
fn ticket_seed_is_well_formed() {
    let config = ticket_list_config().unwrap_or_else(|_| panic!("test"));
    let entities = ticket_seed().unwrap_or_else(|_| panic!("test"));
    assert_well_formed(&config, &entities);
}

#[test]
fn settings_defaults_cover_toggle_catalogs() {
    let business = business_settings_defaults().unwrap_or_else(|_| panic!("test"));
    assert_toggles_present::<EmailNotificationToggle>(&business);

    let platform = platform_settings_defaults().unwrap_or_else(|_| panic!("test"));
    assert_toggles_present::<PlatformAlertToggle>(&platform);
}

#[test]
fn api_key_path_points_at_text_secret() {
    let path: KeyPath = API_KEY_PATH.parse().unwrap_or_else(|_| panic!("test"));
    let tree = business_settings_defaults().unwrap_or_else(|_| panic!("test"));
    assert_eq!(
        tree.scalar(&path).as_ref().and_then(Scalar::as_text),
        Some("sk_live_old")
    );
}

#[test]
fn entities_require_an_id() {
    assert!(entities_from_json(serde_json::json!([{"name": "no id"}])).is_err());
    assert!(entities_from_json(serde_json::json!({"id": 1})).is_err());

    let entities =
        entities_from_json(serde_json::json!([{"id": 7}])).unwrap_or_else(|_| panic!("test"));
    assert_eq!(entities[0].id().as_str(), "7");
}
