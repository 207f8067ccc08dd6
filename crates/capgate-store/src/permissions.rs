//! In-memory implementation of `PermissionStore`.
//!
//! Roles and users are kept in ordered maps behind `Arc<Mutex<_>>`. Adding
//! a capability that is already held, or removing one that is not, is a
//! no-op, which makes declarative apply idempotent against this store.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use capgate_contracts::{
    actor::{Principal, UserId, UserProfile},
    capability::{Capability, CapabilitySet},
    error::{CapgateError, CapgateResult},
};
use capgate_core::traits::PermissionStore;

/// A user as the host stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub login: String,
    pub email: String,
    #[serde(default)]
    pub roles: BTreeSet<String>,
    /// Capabilities stored on the user directly, not through a role.
    #[serde(default)]
    pub capabilities: BTreeSet<Capability>,
}

/// Everything the permission store holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionState {
    /// Role name → capabilities held by the role.
    #[serde(default)]
    pub roles: BTreeMap<String, BTreeSet<Capability>>,
    #[serde(default)]
    pub users: BTreeMap<UserId, UserRecord>,
}

/// Host roles and users held in process memory.
///
/// Clones share the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPermissionStore {
    state: Arc<Mutex<PermissionState>>,
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: PermissionState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Register a role with no capabilities. Existing roles are left as is.
    pub fn add_role(&self, name: impl Into<String>) -> CapgateResult<()> {
        self.lock()?.roles.entry(name.into()).or_default();
        Ok(())
    }

    /// Register or replace a user. Unknown role names are registered too.
    pub fn add_user<I, S>(&self, id: UserId, login: &str, email: &str, roles: I) -> CapgateResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roles: BTreeSet<String> = roles.into_iter().map(Into::into).collect();
        let mut state = self.lock()?;
        for role in &roles {
            state.roles.entry(role.clone()).or_default();
        }
        state.users.insert(
            id,
            UserRecord {
                login: login.to_string(),
                email: email.to_string(),
                roles,
                capabilities: BTreeSet::new(),
            },
        );
        Ok(())
    }

    /// Copy of the full store contents.
    pub fn snapshot(&self) -> CapgateResult<PermissionState> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> CapgateResult<MutexGuard<'_, PermissionState>> {
        self.state.lock().map_err(|e| CapgateError::StoreError {
            reason: format!("permission lock poisoned: {}", e),
        })
    }
}

/// The capability set a principal owns inside `state`.
fn held_mut<'a>(
    state: &'a mut PermissionState,
    principal: &Principal,
) -> CapgateResult<&'a mut BTreeSet<Capability>> {
    let held = match principal {
        Principal::Role(name) => state.roles.get_mut(name),
        Principal::User(id) => state.users.get_mut(id).map(|u| &mut u.capabilities),
    };
    held.ok_or_else(|| CapgateError::StoreError {
        reason: format!("unknown principal '{}'", principal),
    })
}

impl PermissionStore for InMemoryPermissionStore {
    fn list_role_names(&self) -> CapgateResult<Vec<String>> {
        Ok(self.lock()?.roles.keys().cloned().collect())
    }

    fn list_user_ids(&self) -> CapgateResult<Vec<UserId>> {
        Ok(self.lock()?.users.keys().copied().collect())
    }

    fn user_exists(&self, id: UserId) -> bool {
        self.lock()
            .map(|state| state.users.contains_key(&id))
            .unwrap_or(false)
    }

    fn roles_of(&self, id: UserId) -> CapgateResult<BTreeSet<String>> {
        Ok(self
            .lock()?
            .users
            .get(&id)
            .map(|u| u.roles.clone())
            .unwrap_or_default())
    }

    fn user_profile(&self, id: UserId) -> CapgateResult<Option<UserProfile>> {
        Ok(self.lock()?.users.get(&id).map(|u| UserProfile {
            id,
            login: u.login.clone(),
            email: u.email.clone(),
        }))
    }

    fn capabilities_of(&self, principal: &Principal) -> CapgateResult<CapabilitySet> {
        let state = self.lock()?;
        let held = match principal {
            Principal::Role(name) => state.roles.get(name),
            Principal::User(id) => state.users.get(id).map(|u| &u.capabilities),
        };
        Ok(held
            .map(|caps| caps.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn add_capability(&self, principal: &Principal, capability: &Capability) -> CapgateResult<()> {
        let mut state = self.lock()?;
        if held_mut(&mut state, principal)?.insert(capability.clone()) {
            debug!(principal = %principal, capability = %capability, "capability added");
        }
        Ok(())
    }

    fn remove_capability(&self, principal: &Principal, capability: &Capability) -> CapgateResult<()> {
        let mut state = self.lock()?;
        if held_mut(&mut state, principal)?.remove(capability) {
            debug!(principal = %principal, capability = %capability, "capability removed");
        }
        Ok(())
    }
}
