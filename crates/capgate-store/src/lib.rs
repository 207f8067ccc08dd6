//! # capgate-store
//!
//! Reference collaborator implementations for capgate.
//!
//! ## Overview
//!
//! - [`InMemorySettingsStore`] implements
//!   [`SettingsStore`](capgate_core::traits::SettingsStore) over a map.
//! - [`InMemoryPermissionStore`] implements
//!   [`PermissionStore`](capgate_core::traits::PermissionStore) over role
//!   and user records.
//! - [`SiteSnapshot`] persists both to a single JSON file.
//!
//! Both stores keep their state behind `Arc<Mutex<_>>`; clones share state
//! and may be handed to several threads.

pub mod permissions;
pub mod settings;
pub mod snapshot;

pub use permissions::{InMemoryPermissionStore, PermissionState, UserRecord};
pub use settings::InMemorySettingsStore;
pub use snapshot::SiteSnapshot;

// ── Tests ─────────────────────────────────────────────────────────────────────
