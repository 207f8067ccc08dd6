//! # capgate-contracts
//!
//! Shared types, the capability catalog, and error contracts for capgate.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod actor;
pub mod capability;
pub mod config;
pub mod error;
pub mod grant;
pub mod outcome;

#[cfg(test)]
mod tests {
    use super::*;
    use actor::{Principal, UserId};
    use capability::{Capability, CapabilitySet, BOOKING_CAPABILITIES, HOST_CAPABILITIES};
    use config::GateConfig;
    use error::CapgateError;
    use grant::{GrantSettings, RoleGrantMap, SettingsKeys, UserIdList};

    // ── CapabilitySet ────────────────────────────────────────────────────────

    #[test]
    fn capability_set_grant_and_has() {
        let mut caps = CapabilitySet::default();
        let read = Capability::new("amelia_read_finance");
        let manage = Capability::new("amelia_manage_finance");

        assert!(!caps.has(&read));
        assert!(!caps.has(&manage));

        caps.grant(read.clone());
        assert!(caps.has(&read));
        assert!(!caps.has(&manage));

        caps.grant(manage.clone());
        assert!(caps.has(&read));
        assert!(caps.has(&manage));
    }

    #[test]
    fn capability_set_duplicate_grant_is_idempotent() {
        let mut caps = CapabilitySet::default();
        caps.grant(Capability::new("read"));
        caps.grant(Capability::new("read"));
        assert_eq!(caps.len(), 1);
    }

    #[test]
    fn capability_set_preserves_insertion_order() {
        let caps: CapabilitySet = ["c", "a", "b", "a"].into_iter().map(Capability::new).collect();
        let names: Vec<&str> = caps.all().map(Capability::as_str).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn catalog_is_unique_and_complete() {
        let catalog = CapabilitySet::catalog();

        // The booking list repeats no name; the catalog holds both lists.
        assert_eq!(catalog.len(), BOOKING_CAPABILITIES.len() + HOST_CAPABILITIES.len());
        assert_eq!(catalog.len(), 94);

        assert_eq!(catalog.all().next().map(Capability::as_str), Some("amelia_read_appointments"));
        assert_eq!(catalog.all().last().map(Capability::as_str), Some("update_core"));
        assert!(catalog.has_name("amelia_read_coupons"));
        assert!(catalog.has_name("manage_options"));
        assert!(!catalog.has_name("amelia_fly_to_the_moon"));
    }

    #[test]
    fn intersect_keeps_catalog_order() {
        let catalog = CapabilitySet::catalog();
        let requested = vec![
            Capability::new("edit_posts"),
            Capability::new("not_in_catalog"),
            Capability::new("amelia_read_appointments"),
        ];
        let hit = catalog.intersect(&requested);
        let names: Vec<&str> = hit.all().map(Capability::as_str).collect();
        assert_eq!(names, vec!["amelia_read_appointments", "edit_posts"]);
    }

    #[test]
    fn capability_set_deserialize_collapses_duplicates() {
        let caps: CapabilitySet = serde_json::from_str(r#"["b", "a", "b", "a"]"#).unwrap();
        let names: Vec<&str> = caps.all().map(Capability::as_str).collect();
        assert_eq!(names, vec!["b", "a"]);

        let json = serde_json::to_string(&caps).unwrap();
        assert_eq!(json, r#"["b","a"]"#);
    }

    // ── Grant settings ───────────────────────────────────────────────────────

    #[test]
    fn role_grant_map_missing_entry_is_not_granted() {
        let mut map = RoleGrantMap::new();
        map.set("editor", true);
        map.set("author", false);

        assert!(map.is_enabled("editor"));
        assert!(!map.is_enabled("author"));
        assert!(!map.is_enabled("subscriber"));
    }

    #[test]
    fn user_id_list_text_form() {
        let list: UserIdList = [4, 15, 23].into_iter().map(UserId).collect();
        assert_eq!(list.to_text(), "4, 15, 23");
        assert_eq!(UserIdList::default().to_text(), "");
    }

    #[test]
    fn grant_settings_default_is_empty() {
        let settings = GrantSettings::default();
        assert!(settings.role_grants.is_empty());
        assert!(settings.user_ids.is_empty());
        assert!(!settings.force_override);
    }

    #[test]
    fn settings_keys_defaults() {
        let keys = SettingsKeys::default();
        assert_eq!(
            keys.all(),
            ["amelia_role_access_settings", "amelia_user_ids_settings", "aram_force_override"]
        );
    }

    #[test]
    fn gate_config_defaults() {
        let config = GateConfig::default();
        assert_eq!(config.staff_role, "staff");
        assert_eq!(config.default_granted_roles, vec!["staff", "administrator"]);
        assert_eq!(config.report_limit, 100);
    }

    #[test]
    fn principal_display() {
        assert_eq!(Principal::Role("editor".into()).to_string(), "role:editor");
        assert_eq!(Principal::User(UserId(7)).to_string(), "user:7");
    }

    // ── CapgateError display messages ────────────────────────────────────────

    #[test]
    fn error_config_error_display() {
        let err = CapgateError::ConfigError {
            reason: "staff_role must not be empty".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("configuration error"));
        assert!(msg.contains("staff_role"));
    }

    #[test]
    fn error_store_error_display() {
        let err = CapgateError::StoreError {
            reason: "lock poisoned".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("store error"));
        assert!(msg.contains("lock poisoned"));
    }
}
