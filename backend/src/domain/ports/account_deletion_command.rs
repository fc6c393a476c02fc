//! Driving port for cascade account deletion.

use async_trait::async_trait;

use crate::domain::{AccountId, DeletionReport, Error};

/// Deletes an account together with everything that belongs to it or
/// refers to it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountDeletionCommand: Send + Sync {
    /// Delete `account` and cascade to its profile, posts, and every
    /// relationship reference held by other accounts.
    async fn delete_account(&self, account: AccountId) -> Result<DeletionReport, Error>;
}
