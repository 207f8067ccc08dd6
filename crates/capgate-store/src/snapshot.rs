//! JSON file persistence for a whole site: option store plus permissions.
//!
//! The demo CLI loads a snapshot, builds in-memory stores from it, runs one
//! operation, and writes the stores back. Writes go to a sibling temp file
//! first and are renamed into place so a crash never leaves half a file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use capgate_contracts::error::{CapgateError, CapgateResult};

use crate::{
    permissions::{InMemoryPermissionStore, PermissionState},
    settings::InMemorySettingsStore,
};

/// The serialized form of one site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSnapshot {
    /// Option store contents, key → value.
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,
    #[serde(default)]
    pub permissions: PermissionState,
}

impl SiteSnapshot {
    /// Read and decode the snapshot at `path`.
    pub fn load(path: &Path) -> CapgateResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| CapgateError::StoreError {
            reason: format!("failed to read site snapshot '{}': {}", path.display(), e),
        })?;
        serde_json::from_str(&contents).map_err(|e| CapgateError::SerializationError {
            reason: format!("failed to decode site snapshot '{}': {}", path.display(), e),
        })
    }

    /// Encode and write the snapshot to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> CapgateResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| CapgateError::SerializationError {
            reason: format!("failed to encode site snapshot: {}", e),
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|()| fs::rename(&tmp, path))
            .map_err(|e| CapgateError::StoreError {
                reason: format!("failed to write site snapshot '{}': {}", path.display(), e),
            })?;

        info!(
            path = %path.display(),
            settings = self.settings.len(),
            roles = self.permissions.roles.len(),
            users = self.permissions.users.len(),
            "site snapshot written"
        );
        Ok(())
    }

    /// Build live stores holding this snapshot's contents.
    pub fn into_stores(self) -> (InMemorySettingsStore, InMemoryPermissionStore) {
        (
            InMemorySettingsStore::from_map(self.settings),
            InMemoryPermissionStore::from_state(self.permissions),
        )
    }

    /// Capture the current contents of live stores.
    pub fn from_stores(
        settings: &InMemorySettingsStore,
        permissions: &InMemoryPermissionStore,
    ) -> CapgateResult<Self> {
        Ok(Self {
            settings: settings.snapshot()?,
            permissions: permissions.snapshot()?,
        })
    }
}
