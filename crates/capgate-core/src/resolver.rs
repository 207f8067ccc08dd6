//! The capability-grant resolver.
//!
//! Given the fixed catalog, the saved role map, the privileged user list, and
//! the staff sentinel, decide which roles are granted and what an actor
//! effectively holds. Every operation here is a pure in-memory computation:
//! no I/O, no mutation, and no error path. Malformed input narrows to "not
//! granted".

use std::collections::BTreeSet;

use capgate_contracts::{
    actor::{Actor, UserId},
    capability::CapabilitySet,
    config::GateConfig,
    grant::{RoleGrantMap, UserIdList},
};

/// Parse a comma-separated list of user IDs.
///
/// Each token is trimmed and read up to the end of its leading integer.
/// Tokens with no leading integer, that are not positive, or that fail
/// `user_exists` are dropped silently.
/// Surviving IDs keep their order of first appearance; duplicates are kept.
///
/// ```rust,ignore
/// let ids = parse_user_ids("4, 15, abc, -3, 23", |_| true);
/// assert_eq!(ids.to_text(), "4, 15, 23");
/// ```
pub fn parse_user_ids<F>(raw: &str, user_exists: F) -> UserIdList
where
    F: Fn(UserId) -> bool,
{
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(leading_integer)
        .filter(|n| *n > 0)
        .map(|n| UserId(n as u64))
        .filter(|id| user_exists(*id))
        .collect()
}

/// The integer at the start of `token`: an optional sign followed by
/// decimal digits. Anything after the digits is ignored, so "12abc" is 12
/// and "3.5" is 3. No leading digits, or an out-of-range value, is 0.
fn leading_integer(token: &str) -> i64 {
    let unsigned = token.strip_prefix(&['+', '-'][..]).unwrap_or(token);
    let sign_len = token.len() - unsigned.len();
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    token[..sign_len + digits].parse().unwrap_or(0)
}

/// Stateless resolver bound to a catalog and a staff sentinel role.
///
/// Construct one per deployment and share it freely; every method takes
/// `&self` and touches nothing but its arguments.
#[derive(Debug, Clone)]
pub struct CapabilityResolver {
    catalog: CapabilitySet,
    staff_role: String,
}

impl CapabilityResolver {
    pub fn new(catalog: CapabilitySet, staff_role: impl Into<String>) -> Self {
        Self {
            catalog,
            staff_role: staff_role.into(),
        }
    }

    /// Resolver over the compiled-in catalog using the configured staff role.
    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(CapabilitySet::catalog(), config.staff_role.clone())
    }

    pub fn catalog(&self) -> &CapabilitySet {
        &self.catalog
    }

    pub fn staff_role(&self) -> &str {
        &self.staff_role
    }

    /// True if `role` receives the catalog: an explicit `true` entry, or the
    /// staff sentinel.
    pub fn is_role_granted(&self, grants: &RoleGrantMap, role: &str) -> bool {
        role == self.staff_role || grants.is_enabled(role)
    }

    /// The subset of `all_role_names` that should hold the full catalog.
    pub fn resolve_granted_roles<S: AsRef<str>>(
        &self,
        grants: &RoleGrantMap,
        all_role_names: &[S],
    ) -> BTreeSet<String> {
        all_role_names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| self.is_role_granted(grants, name))
            .map(str::to_string)
            .collect()
    }

    /// True if the actor holds a granted role or is individually privileged.
    pub fn is_actor_granted(
        &self,
        actor: &Actor,
        grants: &RoleGrantMap,
        privileged: &UserIdList,
    ) -> bool {
        actor.roles.iter().any(|role| self.is_role_granted(grants, role))
            || privileged.contains(actor.user_id)
    }

    /// What the actor effectively holds: the whole catalog or nothing.
    pub fn effective_capabilities(
        &self,
        actor: &Actor,
        grants: &RoleGrantMap,
        privileged: &UserIdList,
    ) -> CapabilitySet {
        if self.is_actor_granted(actor, grants, privileged) {
            self.catalog.clone()
        } else {
            CapabilitySet::default()
        }
    }
}

impl Default for CapabilityResolver {
    fn default() -> Self {
        Self::from_config(&GateConfig::default())
    }
}
