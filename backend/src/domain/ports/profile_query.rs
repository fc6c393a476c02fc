//! Driving port for reading profiles.

use async_trait::async_trait;

use crate::domain::{AccountId, DisplayName, Error, Profile};

/// A profile joined with its owner's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    /// The stored profile.
    pub profile: Profile,
    /// Owner's display name.
    pub display_name: DisplayName,
}

/// Read-side profile use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Profiles of every active account.
    async fn list_profiles(&self) -> Result<Vec<ProfileView>, Error>;

    /// Profile of `account`; not found when the account has none.
    async fn profile_for(&self, account: &AccountId) -> Result<ProfileView, Error>;
}
