//! Grant configuration: the state an administrator saves.
//!
//! `GrantSettings` bundles the three values persisted in the settings store.
//! Each is replaced wholesale on save; there are no partial updates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::actor::UserId;

/// Role name → "grant the full catalog".
///
/// Missing entries read as not granted. The staff sentinel is handled by the
/// resolver, not stored here, so a stored `false` for it has no effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleGrantMap(pub BTreeMap<String, bool>);

impl RoleGrantMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, role: impl Into<String>, granted: bool) {
        self.0.insert(role.into(), granted);
    }

    /// True only for an explicit `true` entry.
    pub fn is_enabled(&self, role: &str) -> bool {
        self.0.get(role).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &bool)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for RoleGrantMap {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Ordered list of individually privileged users.
///
/// Duplicates are kept as entered. Grants are idempotent, so a repeated ID
/// changes nothing downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdList(pub Vec<UserId>);

impl UserIdList {
    pub fn contains(&self, id: UserId) -> bool {
        self.0.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserId> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Canonical stored form: IDs joined by `", "`, e.g. `"4, 15, 23"`.
    pub fn to_text(&self) -> String {
        self.0
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<UserId> for UserIdList {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Everything one resolution or one apply needs from the settings store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSettings {
    pub role_grants: RoleGrantMap,
    pub user_ids: UserIdList,
    pub force_override: bool,
}

/// Names of the three keys in the host's option store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsKeys {
    pub role_grants: String,
    pub user_ids: String,
    pub force_override: String,
}

impl Default for SettingsKeys {
    fn default() -> Self {
        Self {
            role_grants: "amelia_role_access_settings".to_string(),
            user_ids: "amelia_user_ids_settings".to_string(),
            force_override: "aram_force_override".to_string(),
        }
    }
}

impl SettingsKeys {
    /// All three keys, in the order uninstall deletes them.
    pub fn all(&self) -> [&str; 3] {
        [&self.role_grants, &self.user_ids, &self.force_override]
    }
}

/// Raw admin form submission, before sanitation.
///
/// Field values arrive loosely typed from the host's form surface: checkbox
/// values may be strings, numbers, or bools, and the user field is free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminForm {
    /// Role name → checkbox value. Expected to be a JSON object.
    pub role_grants: serde_json::Value,
    /// Comma-separated user IDs as typed.
    pub user_ids: String,
    pub force_override: serde_json::Value,
}
