//! Driving port for editing profiles.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, Profile, ProfileDraft};

/// Write-side profile use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Create or replace the profile of `account`.
    async fn save_profile(&self, account: AccountId, draft: ProfileDraft)
    -> Result<Profile, Error>;
}
