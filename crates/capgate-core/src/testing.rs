//! Mock collaborators shared by the unit tests in this crate.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use serde_json::Value;

use capgate_contracts::{
    actor::{Principal, UserId, UserProfile},
    capability::{Capability, CapabilitySet},
    error::CapgateResult,
};

use crate::traits::{PermissionStore, SettingsStore};

/// A settings store backed by a plain map.
#[derive(Default)]
pub(crate) struct MapSettings(Mutex<BTreeMap<String, Value>>);

impl MapSettings {
    pub(crate) fn keys(&self) -> Vec<String> {
        self.0.lock().unwrap().keys().cloned().collect()
    }
}

impl SettingsStore for MapSettings {
    fn get(&self, key: &str) -> CapgateResult<Option<Value>> {
        Ok(self.0.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> CapgateResult<()> {
        self.0.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> CapgateResult<bool> {
        Ok(self.0.lock().unwrap().remove(key).is_some())
    }
}

#[derive(Default, Clone, PartialEq, Eq, Debug)]
pub(crate) struct PermissionState {
    pub(crate) roles: BTreeMap<String, BTreeSet<Capability>>,
    pub(crate) users: BTreeMap<UserId, (String, BTreeSet<String>, BTreeSet<Capability>)>,
}

/// A permission store that records every capability on a principal.
#[derive(Default)]
pub(crate) struct MemoryPermissions {
    pub(crate) state: Mutex<PermissionState>,
}

impl MemoryPermissions {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_role(self, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .roles
            .entry(name.to_string())
            .or_default();
        self
    }

    pub(crate) fn with_user(self, id: u64, login: &str, roles: &[&str]) -> Self {
        let roles: BTreeSet<String> = roles.iter().map(|r| r.to_string()).collect();
        self.state
            .lock()
            .unwrap()
            .users
            .insert(UserId(id), (login.to_string(), roles, BTreeSet::new()));
        self
    }

    pub(crate) fn snapshot(&self) -> PermissionState {
        self.state.lock().unwrap().clone()
    }

    /// Every principal that holds at least one capability.
    pub(crate) fn holders(&self) -> Vec<Principal> {
        let state = self.state.lock().unwrap();
        let roles = state
            .roles
            .iter()
            .filter(|(_, caps)| !caps.is_empty())
            .map(|(name, _)| Principal::Role(name.clone()));
        let users = state
            .users
            .iter()
            .filter(|(_, (_, _, caps))| !caps.is_empty())
            .map(|(id, _)| Principal::User(*id));
        roles.chain(users).collect()
    }
}

impl PermissionStore for MemoryPermissions {
    fn list_role_names(&self) -> CapgateResult<Vec<String>> {
        Ok(self.state.lock().unwrap().roles.keys().cloned().collect())
    }

    fn list_user_ids(&self) -> CapgateResult<Vec<UserId>> {
        Ok(self.state.lock().unwrap().users.keys().copied().collect())
    }

    fn user_exists(&self, id: UserId) -> bool {
        self.state.lock().unwrap().users.contains_key(&id)
    }

    fn roles_of(&self, id: UserId) -> CapgateResult<BTreeSet<String>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .get(&id)
            .map(|(_, roles, _)| roles.clone())
            .unwrap_or_default())
    }

    fn user_profile(&self, id: UserId) -> CapgateResult<Option<UserProfile>> {
        Ok(self.state.lock().unwrap().users.get(&id).map(|(login, _, _)| UserProfile {
            id,
            login: login.clone(),
            email: format!("{login}@example.test"),
        }))
    }

    fn capabilities_of(&self, principal: &Principal) -> CapgateResult<CapabilitySet> {
        let state = self.state.lock().unwrap();
        let caps = match principal {
            Principal::Role(name) => state.roles.get(name).cloned().unwrap_or_default(),
            Principal::User(id) => state
                .users
                .get(id)
                .map(|(_, _, caps)| caps.clone())
                .unwrap_or_default(),
        };
        Ok(caps.into_iter().collect())
    }

    fn add_capability(&self, principal: &Principal, capability: &Capability) -> CapgateResult<()> {
        let mut state = self.state.lock().unwrap();
        match principal {
            Principal::Role(name) => {
                if let Some(caps) = state.roles.get_mut(name) {
                    caps.insert(capability.clone());
                }
            }
            Principal::User(id) => {
                if let Some((_, _, caps)) = state.users.get_mut(id) {
                    caps.insert(capability.clone());
                }
            }
        }
        Ok(())
    }

    fn remove_capability(&self, principal: &Principal, capability: &Capability) -> CapgateResult<()> {
        let mut state = self.state.lock().unwrap();
        match principal {
            Principal::Role(name) => {
                if let Some(caps) = state.roles.get_mut(name) {
                    caps.remove(capability);
                }
            }
            Principal::User(id) => {
                if let Some((_, _, caps)) = state.users.get_mut(id) {
                    caps.remove(capability);
                }
            }
        }
        Ok(())
    }
}
