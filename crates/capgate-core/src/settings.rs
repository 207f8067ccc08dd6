//! Typed access to the grant settings in a `SettingsStore`.
//!
//! Stored values are trusted no more than form input: anything malformed
//! narrows to the empty default. Only store I/O failures are errors.

use serde_json::Value;
use tracing::{debug, warn};

use capgate_contracts::{
    error::CapgateResult,
    grant::{GrantSettings, RoleGrantMap, SettingsKeys},
};

use crate::{resolver::parse_user_ids, sanitize::coerce_bool, traits::SettingsStore};

/// Read the three grant settings.
///
/// - role map: a JSON object; non-bool entries are coerced, anything else
///   reads as an empty map
/// - user IDs: canonical text; non-string values read as an empty list
/// - override: coerced; unset reads as false
///
/// User IDs are not checked for existence here. They were checked when they
/// were saved, and apply re-checks them against the permission store.
pub fn load_settings(store: &dyn SettingsStore, keys: &SettingsKeys) -> CapgateResult<GrantSettings> {
    let role_grants = match store.get(&keys.role_grants)? {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(role, granted)| (role.as_str(), coerce_bool(granted)))
            .collect::<RoleGrantMap>(),
        Some(other) => {
            warn!(key = %keys.role_grants, value = %other, "stored role map is not an object; treating as empty");
            RoleGrantMap::new()
        }
        None => RoleGrantMap::new(),
    };

    let user_ids = match store.get(&keys.user_ids)? {
        Some(Value::String(raw)) => parse_user_ids(&raw, |_| true),
        Some(Value::Null) | None => Default::default(),
        Some(other) => {
            warn!(key = %keys.user_ids, value = %other, "stored user list is not text; treating as empty");
            Default::default()
        }
    };

    let force_override = store
        .get(&keys.force_override)?
        .map(|v| coerce_bool(&v))
        .unwrap_or(false);

    debug!(
        roles = role_grants.0.len(),
        users = user_ids.len(),
        force_override,
        "grant settings loaded"
    );

    Ok(GrantSettings {
        role_grants,
        user_ids,
        force_override,
    })
}

/// Replace all three grant settings.
pub fn save_settings(
    store: &dyn SettingsStore,
    keys: &SettingsKeys,
    settings: &GrantSettings,
) -> CapgateResult<()> {
    let role_map: serde_json::Map<String, Value> = settings
        .role_grants
        .iter()
        .map(|(role, granted)| (role.clone(), Value::Bool(*granted)))
        .collect();

    store.set(&keys.role_grants, Value::Object(role_map))?;
    store.set(&keys.user_ids, Value::String(settings.user_ids.to_text()))?;
    store.set(&keys.force_override, Value::Bool(settings.force_override))?;

    debug!(
        roles = settings.role_grants.0.len(),
        users = settings.user_ids.len(),
        force_override = settings.force_override,
        "grant settings saved"
    );
    Ok(())
}

/// Delete all three grant settings. Returns how many keys were set.
pub fn clear_settings(store: &dyn SettingsStore, keys: &SettingsKeys) -> CapgateResult<usize> {
    let mut removed = 0;
    for key in keys.all() {
        if store.delete(key)? {
            removed += 1;
        }
    }
    Ok(removed)
}
