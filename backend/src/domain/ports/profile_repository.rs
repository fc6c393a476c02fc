//! Driven port for profile persistence.

use async_trait::async_trait;

use crate::domain::{AccountId, Profile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile store adapters.
    pub enum ProfileRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "profile store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "profile store query failed: {message}",
    }
}

/// Persistence contract for profiles, keyed by owning account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Insert or replace the profile for `profile.account_id`.
    async fn upsert(&self, profile: &Profile) -> Result<(), ProfileRepositoryError>;

    /// Fetch the profile owned by `account_id`.
    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// List every profile.
    async fn list(&self) -> Result<Vec<Profile>, ProfileRepositoryError>;

    /// Delete the profile owned by `account_id`; `false` when none existed.
    async fn delete_by_account(&self, account_id: &AccountId)
    -> Result<bool, ProfileRepositoryError>;
}
