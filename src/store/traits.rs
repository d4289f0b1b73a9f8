//! `ProfileStore` trait: single async interface for onboarding persistence.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::onboarding::model::{OnboardingProfile, storage_keys};

/// Identifies whose profile is being read or written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerKey(String);

impl OwnerKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The fixed key used for single-user device storage.
    pub fn device() -> Self {
        Self(storage_keys::DEVICE_PROFILE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend-agnostic profile persistence.
///
/// `get` returns `Ok(None)` when no profile has been saved yet; that is not
/// a fault. `put` always writes the full profile (last write wins).
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Whether callers must present an authenticated owner key.
    fn requires_identity(&self) -> bool;

    /// Load the profile for `owner`.
    async fn get(&self, owner: &OwnerKey) -> Result<Option<OnboardingProfile>, StoreError>;

    /// Replace the profile for `owner`.
    async fn put(&self, owner: &OwnerKey, profile: &OnboardingProfile) -> Result<(), StoreError>;
}
