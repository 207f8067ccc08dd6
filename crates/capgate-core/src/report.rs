//! Access report: who currently passes checks for catalog capabilities.
//!
//! Capabilities are evaluated through the full authorization pipeline, so
//! the report reflects override mode as well as persisted grants.

use std::collections::BTreeMap;

use tracing::debug;

use capgate_contracts::{
    actor::Principal,
    capability::CapabilitySet,
    error::CapgateResult,
    outcome::{AccessReport, UserAccess},
};

use crate::{intercept::AuthorizationPipeline, traits::PermissionStore};

/// Scan up to `limit` users, lowest ID first, and list those holding at
/// least one catalog capability.
pub fn users_with_capabilities(
    store: &dyn PermissionStore,
    pipeline: &AuthorizationPipeline,
    catalog: &CapabilitySet,
    limit: usize,
) -> CapgateResult<AccessReport> {
    let mut ids = store.list_user_ids()?;
    ids.sort();
    let total_users = ids.len();
    let requested: Vec<_> = catalog.all().cloned().collect();

    let mut users = Vec::new();
    for id in ids.into_iter().take(limit) {
        let Some(profile) = store.user_profile(id)? else {
            continue;
        };
        let actor = pipeline.actor_for(id)?;
        let allow = pipeline.evaluate(&actor, &requested)?;
        let capabilities: CapabilitySet = catalog
            .all()
            .filter(|c| allow.get(*c).copied().unwrap_or(false))
            .cloned()
            .collect();

        if !capabilities.is_empty() {
            users.push(UserAccess {
                id,
                login: profile.login,
                email: profile.email,
                capabilities,
            });
        }
    }

    debug!(
        scanned = total_users.min(limit),
        total_users,
        matched = users.len(),
        "access report built"
    );

    Ok(AccessReport {
        users,
        truncated: total_users > limit,
        total_users,
    })
}

/// Number of catalog capabilities each role currently holds.
pub fn role_capability_counts(
    store: &dyn PermissionStore,
    catalog: &CapabilitySet,
) -> CapgateResult<BTreeMap<String, usize>> {
    let mut counts = BTreeMap::new();
    for role in store.list_role_names()? {
        let held = store.capabilities_of(&Principal::Role(role.clone()))?;
        let count = held.all().filter(|c| catalog.has(c)).count();
        counts.insert(role, count);
    }
    Ok(counts)
}
