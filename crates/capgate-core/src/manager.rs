//! The access manager: an explicitly constructed capgate instance.
//!
//! The manager wires the resolver to the host's two stores and exposes the
//! operations the host calls: save the admin form, apply, build the
//! authorization pipeline, run checks, and produce the access report.
//! Lifecycle hooks live in `lifecycle` and take a manager as an argument.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use capgate_contracts::{
    actor::{Actor, UserId},
    capability::{Capability, CapabilitySet},
    config::GateConfig,
    error::CapgateResult,
    grant::{AdminForm, GrantSettings},
    outcome::{AccessReport, ApplyReport, ReportSort, SaveOutcome},
};

use crate::{
    applier::GrantApplier,
    intercept::{AuthorizationPipeline, OverrideInterceptor},
    report,
    resolver::{parse_user_ids, CapabilityResolver},
    sanitize::{coerce_bool, sanitize_role_grants},
    settings,
    traits::{PermissionStore, SettingsStore},
};

pub const SAVED_MESSAGE: &str = "Settings saved and capabilities applied successfully!";
pub const OVERRIDE_ACTIVE_MESSAGE: &str = "Force override filter is now active.";

pub struct AccessManager {
    config: GateConfig,
    resolver: CapabilityResolver,
    settings: Arc<dyn SettingsStore>,
    permissions: Arc<dyn PermissionStore>,
    applier: GrantApplier,
}

impl AccessManager {
    pub fn new(
        config: GateConfig,
        settings: Arc<dyn SettingsStore>,
        permissions: Arc<dyn PermissionStore>,
    ) -> Self {
        let resolver = CapabilityResolver::from_config(&config);
        let applier = GrantApplier::new(resolver.clone(), permissions.clone());
        Self {
            config,
            resolver,
            settings,
            permissions,
            applier,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn resolver(&self) -> &CapabilityResolver {
        &self.resolver
    }

    pub fn catalog(&self) -> &CapabilitySet {
        self.resolver.catalog()
    }

    pub(crate) fn settings_store(&self) -> &dyn SettingsStore {
        self.settings.as_ref()
    }

    pub(crate) fn permission_store(&self) -> &dyn PermissionStore {
        self.permissions.as_ref()
    }

    pub(crate) fn applier(&self) -> &GrantApplier {
        &self.applier
    }

    /// Current grant settings from the settings store.
    pub fn load_settings(&self) -> CapgateResult<GrantSettings> {
        settings::load_settings(self.settings.as_ref(), &self.config.keys)
    }

    /// Apply the stored settings to the permission store.
    pub fn apply(&self) -> CapgateResult<ApplyReport> {
        let current = self.load_settings()?;
        self.applier.apply(&current)
    }

    /// Sanitize a form submission, persist it wholesale, and apply it.
    ///
    /// Host-side gating (who may submit, CSRF) happens before this is called.
    pub fn save_from_form(&self, form: &AdminForm) -> CapgateResult<SaveOutcome> {
        let role_names = self.permissions.list_role_names()?;
        let submitted = GrantSettings {
            role_grants: sanitize_role_grants(&form.role_grants, &role_names),
            user_ids: parse_user_ids(&form.user_ids, |id| self.permissions.user_exists(id)),
            force_override: coerce_bool(&form.force_override),
        };

        settings::save_settings(self.settings.as_ref(), &self.config.keys, &submitted)?;
        let report = self.applier.apply(&submitted)?;

        let mut message = SAVED_MESSAGE.to_string();
        if submitted.force_override {
            message.push(' ');
            message.push_str(OVERRIDE_ACTIVE_MESSAGE);
        }

        info!(
            roles_granted = report.granted_roles.len(),
            users = submitted.user_ids.len(),
            force_override = submitted.force_override,
            "admin settings saved"
        );

        Ok(SaveOutcome {
            settings: submitted,
            report,
            message,
        })
    }

    /// The authorization pipeline for the current request.
    ///
    /// Settings are read once here. The override stage is installed only
    /// when override mode is on.
    pub fn pipeline(&self) -> CapgateResult<AuthorizationPipeline> {
        let current = self.load_settings()?;
        let mut pipeline = AuthorizationPipeline::new(self.permissions.clone());
        if let Some(stage) = OverrideInterceptor::for_settings(&self.resolver, &current) {
            pipeline = pipeline.with_stage(Box::new(stage));
        }
        Ok(pipeline)
    }

    /// The actor for an existing user, from its stored role memberships.
    pub fn actor(&self, user_id: UserId) -> CapgateResult<Actor> {
        Ok(Actor {
            user_id,
            roles: self.permissions.roles_of(user_id)?,
        })
    }

    /// What the stored settings entitle the actor to, whatever is persisted.
    pub fn effective_capabilities(&self, actor: &Actor) -> CapgateResult<CapabilitySet> {
        let current = self.load_settings()?;
        Ok(self
            .resolver
            .effective_capabilities(actor, &current.role_grants, &current.user_ids))
    }

    /// Run one permission check for a user through the full pipeline.
    pub fn user_can(&self, user_id: UserId, capability: &Capability) -> CapgateResult<bool> {
        let pipeline = self.pipeline()?;
        let actor = pipeline.actor_for(user_id)?;
        pipeline.has_capability(&actor, capability)
    }

    /// Users holding catalog capabilities, scanning at most `limit` users
    /// (the configured report limit when `None`).
    pub fn access_report(&self, limit: Option<usize>, sort: ReportSort) -> CapgateResult<AccessReport> {
        let pipeline = self.pipeline()?;
        let mut access = report::users_with_capabilities(
            self.permissions.as_ref(),
            &pipeline,
            self.catalog(),
            limit.unwrap_or(self.config.report_limit),
        )?;
        access.sort_by(sort);
        Ok(access)
    }

    /// Catalog capabilities currently held by each role.
    pub fn role_capability_counts(&self) -> CapgateResult<BTreeMap<String, usize>> {
        report::role_capability_counts(self.permissions.as_ref(), self.catalog())
    }
}
