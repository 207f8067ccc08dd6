//! Override mode as an explicit authorization middleware stage.
//!
//! The host answers a permission check by building an allow-set from its
//! persisted records and then running each registered interceptor over it:
//!
//!   PermissionStore → base AllowSet → [interceptor stages] → decision
//!
//! `OverrideInterceptor` is the stage capgate contributes when override mode
//! is on. It injects the actor's effective capabilities, limited to what the
//! check asked for, without writing anything to the permission store.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use capgate_contracts::{
    actor::{Actor, Principal, UserId},
    capability::Capability,
    error::CapgateResult,
    grant::GrantSettings,
};

use crate::{
    resolver::CapabilityResolver,
    traits::{CapabilityInterceptor, PermissionStore},
};

/// Capability → allowed, as seen by one permission check.
pub type AllowSet = BTreeMap<Capability, bool>;

/// Grants the catalog at check time to actors the saved settings select.
///
/// Holds a snapshot of the settings taken when the interceptor was built,
/// matching the host's load-at-request-start lifecycle.
#[derive(Debug, Clone)]
pub struct OverrideInterceptor {
    resolver: CapabilityResolver,
    settings: GrantSettings,
}

impl OverrideInterceptor {
    pub fn new(resolver: CapabilityResolver, settings: GrantSettings) -> Self {
        Self { resolver, settings }
    }

    /// The interceptor to install for `settings`, or `None` when override
    /// mode is off.
    pub fn for_settings(resolver: &CapabilityResolver, settings: &GrantSettings) -> Option<Self> {
        settings
            .force_override
            .then(|| Self::new(resolver.clone(), settings.clone()))
    }
}

impl CapabilityInterceptor for OverrideInterceptor {
    /// Mark each requested capability the actor is entitled to as allowed.
    ///
    /// Entries are only ever set to `true`; nothing the host already allows
    /// is taken away. An empty request leaves `allow` untouched.
    fn intercept(&self, allow: &mut AllowSet, requested: &[Capability], actor: &Actor) {
        if requested.is_empty() {
            return;
        }

        let effective = self.resolver.effective_capabilities(
            actor,
            &self.settings.role_grants,
            &self.settings.user_ids,
        );
        if effective.is_empty() {
            return;
        }

        for capability in effective.intersect(requested).all() {
            debug!(
                user_id = %actor.user_id,
                capability = %capability,
                "override granted capability"
            );
            allow.insert(capability.clone(), true);
        }
    }
}

/// The host's permission-check pipeline.
///
/// Reads the base allow-set from persisted records (the actor's roles plus
/// capabilities stored on the user directly) and runs each stage in
/// registration order.
pub struct AuthorizationPipeline {
    store: Arc<dyn PermissionStore>,
    stages: Vec<Box<dyn CapabilityInterceptor>>,
}

impl AuthorizationPipeline {
    pub fn new(store: Arc<dyn PermissionStore>) -> Self {
        Self {
            store,
            stages: Vec::new(),
        }
    }

    /// Append a stage. Stages run in the order they were added.
    pub fn with_stage(mut self, stage: Box<dyn CapabilityInterceptor>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Build the actor for an existing user from its stored role memberships.
    pub fn actor_for(&self, user_id: UserId) -> CapgateResult<Actor> {
        Ok(Actor {
            user_id,
            roles: self.store.roles_of(user_id)?,
        })
    }

    /// Everything persisted records allow the actor, before any stage runs.
    pub fn base_allow_set(&self, actor: &Actor) -> CapgateResult<AllowSet> {
        let mut allow = AllowSet::new();
        for role in &actor.roles {
            for capability in &self.store.capabilities_of(&Principal::Role(role.clone()))? {
                allow.insert(capability.clone(), true);
            }
        }
        for capability in &self.store.capabilities_of(&Principal::User(actor.user_id))? {
            allow.insert(capability.clone(), true);
        }
        Ok(allow)
    }

    /// Run a full check and return the final allow-set.
    pub fn evaluate(&self, actor: &Actor, requested: &[Capability]) -> CapgateResult<AllowSet> {
        let mut allow = self.base_allow_set(actor)?;
        for stage in &self.stages {
            stage.intercept(&mut allow, requested, actor);
        }
        Ok(allow)
    }

    /// True if the actor passes a check for `capability`.
    pub fn has_capability(&self, actor: &Actor, capability: &Capability) -> CapgateResult<bool> {
        let allow = self.evaluate(actor, std::slice::from_ref(capability))?;
        Ok(allow.get(capability).copied().unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use capgate_contracts::{
        actor::{Actor, Principal, UserId},
        capability::Capability,
        grant::GrantSettings,
    };

    use crate::{
        resolver::CapabilityResolver,
        testing::MemoryPermissions,
        traits::{CapabilityInterceptor, PermissionStore},
    };

    use super::{AllowSet, AuthorizationPipeline, OverrideInterceptor};

    fn settings(roles: &[&str], users: &[u64], force_override: bool) -> GrantSettings {
        let mut s = GrantSettings::default();
        for role in roles {
            s.role_grants.set(*role, true);
        }
        s.user_ids = users.iter().copied().map(UserId).collect();
        s.force_override = force_override;
        s
    }

    fn cap(name: &str) -> Capability {
        Capability::new(name)
    }

    #[test]
    fn interceptor_is_only_built_when_override_is_on() {
        let resolver = CapabilityResolver::default();
        assert!(OverrideInterceptor::for_settings(&resolver, &settings(&["editor"], &[], false)).is_none());
        assert!(OverrideInterceptor::for_settings(&resolver, &settings(&["editor"], &[], true)).is_some());
    }

    #[test]
    fn interceptor_grants_only_requested_catalog_entries() {
        let interceptor =
            OverrideInterceptor::new(CapabilityResolver::default(), settings(&["editor"], &[], true));
        let actor = Actor::new(UserId(1), ["editor"]);
        let mut allow = AllowSet::new();

        interceptor.intercept(
            &mut allow,
            &[cap("amelia_read_finance"), cap("not_a_catalog_entry")],
            &actor,
        );

        assert_eq!(allow.len(), 1);
        assert_eq!(allow.get(&cap("amelia_read_finance")), Some(&true));
    }

    #[test]
    fn interceptor_leaves_unselected_actor_untouched() {
        let interceptor =
            OverrideInterceptor::new(CapabilityResolver::default(), settings(&["editor"], &[], true));
        let actor = Actor::new(UserId(9), ["subscriber"]);
        let mut allow = AllowSet::new();
        allow.insert(cap("read"), true);
        allow.insert(cap("edit_posts"), false);

        interceptor.intercept(&mut allow, &[cap("edit_posts")], &actor);

        assert_eq!(allow.get(&cap("read")), Some(&true));
        assert_eq!(allow.get(&cap("edit_posts")), Some(&false));
    }

    #[test]
    fn interceptor_ignores_empty_request() {
        let interceptor =
            OverrideInterceptor::new(CapabilityResolver::default(), settings(&[], &[], true));
        let actor = Actor::new(UserId(1), ["staff"]);
        let mut allow = AllowSet::new();

        interceptor.intercept(&mut allow, &[], &actor);

        assert!(allow.is_empty());
    }

    #[test]
    fn interceptor_grants_listed_user_without_role() {
        let interceptor =
            OverrideInterceptor::new(CapabilityResolver::default(), settings(&[], &[42], true));
        let actor = Actor::new(UserId(42), Vec::<String>::new());
        let mut allow = AllowSet::new();

        interceptor.intercept(&mut allow, &[cap("amelia_manage_calendar")], &actor);

        assert_eq!(allow.get(&cap("amelia_manage_calendar")), Some(&true));
    }

    #[test]
    fn pipeline_without_stages_reads_persisted_records() {
        let store = Arc::new(
            MemoryPermissions::new()
                .with_role("editor")
                .with_user(1, "ed", &["editor"]),
        );
        store.add_capability(&Principal::Role("editor".into()), &cap("edit_posts")).unwrap();
        store.add_capability(&Principal::User(UserId(1)), &cap("upload_files")).unwrap();

        let pipeline = AuthorizationPipeline::new(store.clone());
        let actor = pipeline.actor_for(UserId(1)).unwrap();

        assert!(pipeline.has_capability(&actor, &cap("edit_posts")).unwrap());
        assert!(pipeline.has_capability(&actor, &cap("upload_files")).unwrap());
        assert!(!pipeline.has_capability(&actor, &cap("amelia_read_finance")).unwrap());
    }

    #[test]
    fn pipeline_with_override_stage_grants_without_persisting() {
        let store = Arc::new(
            MemoryPermissions::new()
                .with_role("editor")
                .with_user(1, "ed", &["editor"]),
        );
        let resolver = CapabilityResolver::default();
        let stage = OverrideInterceptor::for_settings(&resolver, &settings(&["editor"], &[], true))
            .expect("override on");
        let pipeline = AuthorizationPipeline::new(store.clone()).with_stage(Box::new(stage));
        let actor = pipeline.actor_for(UserId(1)).unwrap();

        assert!(pipeline.has_capability(&actor, &cap("amelia_read_finance")).unwrap());
        assert!(store
            .capabilities_of(&Principal::Role("editor".into()))
            .unwrap()
            .is_empty());
    }
}
