//! Local device store: one flat JSON record, no per-user keys.
//!
//! Mirrors browser local storage. Every owner key maps to the same record,
//! so this backend assumes a single user per device.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::onboarding::model::OnboardingProfile;
use crate::store::traits::{OwnerKey, ProfileStore};

/// Local profile store, backed by a JSON file or by memory.
pub struct LocalProfileStore {
    path: Option<PathBuf>,
    memory: RwLock<Option<OnboardingProfile>>,
}

impl LocalProfileStore {
    /// Use a JSON file, creating its parent directory if needed.
    pub async fn new_file(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        info!(path = %path.display(), "Local profile store opened");
        Ok(Self {
            path: Some(path.to_path_buf()),
            memory: RwLock::new(None),
        })
    }

    /// Keep the record in memory only (for tests).
    pub fn in_memory() -> Self {
        Self {
            path: None,
            memory: RwLock::new(None),
        }
    }

    async fn read_file(path: &Path) -> Result<Option<OnboardingProfile>, StoreError> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Serialization(format!("{}: {e}", path.display())))
    }

    async fn write_file(path: &Path, profile: &OnboardingProfile) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(profile)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        // Readers only ever see a whole record.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for LocalProfileStore {
    fn name(&self) -> &'static str {
        "local"
    }

    fn requires_identity(&self) -> bool {
        false
    }

    async fn get(&self, owner: &OwnerKey) -> Result<Option<OnboardingProfile>, StoreError> {
        debug!(%owner, "Loading local profile");
        match &self.path {
            Some(path) => Self::read_file(path).await,
            None => Ok(self.memory.read().await.clone()),
        }
    }

    async fn put(&self, owner: &OwnerKey, profile: &OnboardingProfile) -> Result<(), StoreError> {
        debug!(%owner, "Saving local profile");
        if let Some(path) = &self.path {
            Self::write_file(path, profile).await?;
        }
        *self.memory.write().await = Some(profile.clone());
        Ok(())
    }
}
