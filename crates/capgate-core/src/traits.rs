//! Collaborator trait definitions.
//!
//! capgate owns no storage. The host supplies these three seams:
//!
//! - `SettingsStore`        — the key-value option store holding the grant settings
//! - `PermissionStore`      — persisted roles, users, and their capabilities
//! - `CapabilityInterceptor` — a stage in the host's permission-check pipeline
//!
//! Resolution itself is pure and lives in `resolver`; these traits are only
//! touched by settings load/save, declarative apply, and the report.

use std::collections::BTreeSet;

use serde_json::Value;

use capgate_contracts::{
    actor::{Actor, Principal, UserId, UserProfile},
    capability::{Capability, CapabilitySet},
    error::CapgateResult,
};

use crate::intercept::AllowSet;

/// The host's key-value option store.
///
/// Single-value reads and replaces must be atomic; capgate adds no locking
/// of its own. Last write wins.
pub trait SettingsStore: Send + Sync {
    /// Return the stored value, or `None` when the key is not set.
    fn get(&self, key: &str) -> CapgateResult<Option<Value>>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: Value) -> CapgateResult<()>;

    /// Remove `key`. Returns true if it was set.
    fn delete(&self, key: &str) -> CapgateResult<bool>;
}

/// Persisted role and user permission records.
///
/// `add_capability` and `remove_capability` must be idempotent: adding a
/// capability already held, or removing one not held, is a successful no-op.
pub trait PermissionStore: Send + Sync {
    /// Every role name the host knows, in the host's order.
    fn list_role_names(&self) -> CapgateResult<Vec<String>>;

    /// Every user ID the host knows, ascending.
    fn list_user_ids(&self) -> CapgateResult<Vec<UserId>>;

    /// True if `id` names an existing user. Lookup failures read as false.
    fn user_exists(&self, id: UserId) -> bool;

    /// Role memberships of the given user. Unknown users have none.
    fn roles_of(&self, id: UserId) -> CapgateResult<BTreeSet<String>>;

    /// Display fields for the given user, if it exists.
    fn user_profile(&self, id: UserId) -> CapgateResult<Option<UserProfile>>;

    /// Capabilities stored directly on the principal.
    fn capabilities_of(&self, principal: &Principal) -> CapgateResult<CapabilitySet>;

    fn add_capability(&self, principal: &Principal, capability: &Capability) -> CapgateResult<()>;

    fn remove_capability(&self, principal: &Principal, capability: &Capability) -> CapgateResult<()>;
}

/// A rewrite stage in the host's authorization pipeline.
///
/// Stages run in registration order after the base allow-set has been read
/// from the permission store. A stage may add entries to `allow`; it is
/// handed the capabilities the current check asked for.
pub trait CapabilityInterceptor: Send + Sync {
    fn intercept(&self, allow: &mut AllowSet, requested: &[Capability], actor: &Actor);
}
