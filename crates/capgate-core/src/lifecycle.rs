//! Install lifecycle hooks.
//!
//! Plain functions the host's extension-point dispatcher calls with an
//! explicitly constructed `AccessManager`:
//!
//! - `activate`   — seed defaults for unset keys, then apply
//! - `deactivate` — strip the catalog from every role and user
//! - `uninstall`  — delete the settings keys, then strip
//!
//! All three are safe to run again after a partial failure.

use serde_json::Value;
use tracing::info;

use capgate_contracts::{
    error::CapgateResult,
    outcome::{ApplyReport, StripReport},
};

use crate::{manager::AccessManager, settings};

/// An install lifecycle event raised by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Activate,
    Deactivate,
    Uninstall,
}

/// What a lifecycle hook did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleOutcome {
    Activated(ApplyReport),
    Deactivated(StripReport),
    Uninstalled {
        keys_removed: usize,
        strip: StripReport,
    },
}

/// Route a lifecycle event to its hook.
pub fn dispatch(manager: &AccessManager, event: LifecycleEvent) -> CapgateResult<LifecycleOutcome> {
    match event {
        LifecycleEvent::Activate => activate(manager).map(LifecycleOutcome::Activated),
        LifecycleEvent::Deactivate => deactivate(manager).map(LifecycleOutcome::Deactivated),
        LifecycleEvent::Uninstall => {
            let (keys_removed, strip) = uninstall(manager)?;
            Ok(LifecycleOutcome::Uninstalled { keys_removed, strip })
        }
    }
}

/// Seed defaults where nothing is stored yet, then apply.
///
/// An existing role map or override flag is left alone, so reactivating
/// keeps the administrator's choices.
pub fn activate(manager: &AccessManager) -> CapgateResult<ApplyReport> {
    let store = manager.settings_store();
    let config = manager.config();

    if store.get(&config.keys.role_grants)?.is_none() {
        let defaults: serde_json::Map<String, Value> = config
            .default_granted_roles
            .iter()
            .map(|role| (role.clone(), Value::Bool(true)))
            .collect();
        store.set(&config.keys.role_grants, Value::Object(defaults))?;
        info!(roles = ?config.default_granted_roles, "seeded default role grants");
    }

    if store.get(&config.keys.force_override)?.is_none() {
        store.set(&config.keys.force_override, Value::Bool(false))?;
    }

    manager.apply()
}

/// Strip the catalog from every role and every known user.
pub fn deactivate(manager: &AccessManager) -> CapgateResult<StripReport> {
    let users = manager.permission_store().list_user_ids()?;
    manager.applier().strip(&users)
}

/// Delete the three settings keys, then strip like `deactivate`.
///
/// Returns how many keys were set before deletion and what was stripped.
pub fn uninstall(manager: &AccessManager) -> CapgateResult<(usize, StripReport)> {
    let removed = settings::clear_settings(manager.settings_store(), &manager.config().keys)?;
    info!(keys_removed = removed, "settings deleted");
    let strip = deactivate(manager)?;
    Ok((removed, strip))
}
