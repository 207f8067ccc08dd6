//! Declarative apply: writing grants onto persisted role and user records.
//!
//! `apply` brings the permission store in line with the saved settings.
//! `strip` is its inverse. Both only call idempotent store mutators, so
//! re-running either after a partial failure converges on the same state.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use capgate_contracts::{
    actor::{Principal, UserId},
    error::CapgateResult,
    grant::GrantSettings,
    outcome::{ApplyReport, StripReport},
};

use crate::{resolver::CapabilityResolver, traits::PermissionStore};

/// Applies and strips the catalog on a permission store.
pub struct GrantApplier {
    resolver: CapabilityResolver,
    store: Arc<dyn PermissionStore>,
}

impl GrantApplier {
    pub fn new(resolver: CapabilityResolver, store: Arc<dyn PermissionStore>) -> Self {
        Self { resolver, store }
    }

    /// Bring every role and listed user in line with `settings`.
    ///
    /// 1. Each known role gets the full catalog if granted (explicit `true`
    ///    or the staff sentinel) and loses it otherwise.
    /// 2. Each listed user that still exists gets the full catalog directly.
    ///    Users are only ever added to here; `strip` is what removes them.
    pub fn apply(&self, settings: &GrantSettings) -> CapgateResult<ApplyReport> {
        let role_names = self.store.list_role_names()?;
        let granted_roles = self
            .resolver
            .resolve_granted_roles(&settings.role_grants, &role_names);

        let mut revoked_roles = BTreeSet::new();
        for role in &role_names {
            let principal = Principal::Role(role.clone());
            if granted_roles.contains(role) {
                self.grant_catalog(&principal)?;
            } else {
                self.revoke_catalog(&principal)?;
                revoked_roles.insert(role.clone());
            }
        }

        let mut granted_users = Vec::new();
        let mut skipped_users = Vec::new();
        for &id in settings.user_ids.iter() {
            if self.store.user_exists(id) {
                self.grant_catalog(&Principal::User(id))?;
                granted_users.push(id);
            } else {
                warn!(user_id = %id, "listed user no longer exists; skipping");
                skipped_users.push(id);
            }
        }

        info!(
            granted_roles = granted_roles.len(),
            revoked_roles = revoked_roles.len(),
            granted_users = granted_users.len(),
            "capabilities applied"
        );

        Ok(ApplyReport {
            granted_roles,
            revoked_roles,
            granted_users,
            skipped_users,
            applied_at: Utc::now(),
        })
    }

    /// Remove the catalog from every role and from each of `users`.
    pub fn strip(&self, users: &[UserId]) -> CapgateResult<StripReport> {
        let role_names = self.store.list_role_names()?;
        for role in &role_names {
            self.revoke_catalog(&Principal::Role(role.clone()))?;
        }

        let mut stripped_users = 0;
        for &id in users {
            if self.store.user_exists(id) {
                self.revoke_catalog(&Principal::User(id))?;
                stripped_users += 1;
            }
        }

        info!(
            roles = role_names.len(),
            users = stripped_users,
            "capabilities stripped"
        );

        Ok(StripReport {
            roles: role_names.len(),
            users: stripped_users,
        })
    }

    fn grant_catalog(&self, principal: &Principal) -> CapgateResult<()> {
        debug!(principal = %principal, "granting catalog");
        for capability in self.resolver.catalog() {
            self.store.add_capability(principal, capability)?;
        }
        Ok(())
    }

    fn revoke_catalog(&self, principal: &Principal) -> CapgateResult<()> {
        debug!(principal = %principal, "revoking catalog");
        for capability in self.resolver.catalog() {
            self.store.remove_capability(principal, capability)?;
        }
        Ok(())
    }
}
