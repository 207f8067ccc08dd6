//! # capgate-core
//!
//! Capability-grant resolution for a host with roles, users, and a
//! key-value option store.
//!
//! This crate provides:
//! - The collaborator traits (`SettingsStore`, `PermissionStore`, `CapabilityInterceptor`)
//! - The pure `CapabilityResolver` and input sanitation
//! - Declarative apply/strip (`GrantApplier`) and the override middleware
//! - `AccessManager`, which wires them together, and the lifecycle hooks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use capgate_core::{lifecycle, AccessManager};
//!
//! let manager = AccessManager::new(config, settings_store, permission_store);
//! lifecycle::activate(&manager)?;
//! let allowed = manager.user_can(UserId(4), &Capability::new("amelia_read_finance"))?;
//! ```

pub mod applier;
pub mod intercept;
pub mod lifecycle;
pub mod manager;
pub mod report;
pub mod resolver;
pub mod sanitize;
pub mod settings;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use applier::GrantApplier;
pub use intercept::{AllowSet, AuthorizationPipeline, OverrideInterceptor};
pub use manager::AccessManager;
pub use resolver::{parse_user_ids, CapabilityResolver};

// ── Tests ─────────────────────────────────────────────────────────────────────
