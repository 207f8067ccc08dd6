//! Results returned by declarative apply, the admin save flow, and the
//! access report.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    actor::UserId,
    capability::CapabilitySet,
    grant::GrantSettings,
};

/// What one declarative apply wrote to the permission store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    /// Roles that now hold the full catalog.
    pub granted_roles: BTreeSet<String>,
    /// Roles the catalog was removed from.
    pub revoked_roles: BTreeSet<String>,
    /// Existing listed users that now hold the full catalog directly.
    pub granted_users: Vec<UserId>,
    /// Listed IDs that no longer resolve to a user and were skipped.
    pub skipped_users: Vec<UserId>,
    pub applied_at: DateTime<Utc>,
}

/// What one strip (deactivate or uninstall) removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripReport {
    pub roles: usize,
    pub users: usize,
}

/// The result of saving the admin form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    /// The sanitized settings as persisted.
    pub settings: GrantSettings,
    pub report: ApplyReport,
    /// Notice the host may show the administrator.
    pub message: String,
}

/// One row of the access report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccess {
    pub id: UserId,
    pub login: String,
    pub email: String,
    /// Catalog capabilities the user passes a permission check for.
    pub capabilities: CapabilitySet,
}

/// Row ordering for the access report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSort {
    #[default]
    Id,
    Login,
}

/// Users holding at least one catalog capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessReport {
    pub users: Vec<UserAccess>,
    /// The host has more users than the scan limit; later users were not checked.
    pub truncated: bool,
    pub total_users: usize,
}

impl AccessReport {
    pub fn sort_by(&mut self, sort: ReportSort) {
        match sort {
            ReportSort::Id => self.users.sort_by_key(|u| u.id),
            ReportSort::Login => self
                .users
                .sort_by(|a, b| a.login.to_lowercase().cmp(&b.login.to_lowercase())),
        }
    }
}
