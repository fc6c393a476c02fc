//! Driving port for reading accounts.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, Error};

/// Read-side use cases for accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsQuery: Send + Sync {
    /// Active accounts, oldest first.
    async fn list_accounts(&self) -> Result<Vec<Account>, Error>;

    /// A single active account; not found when missing or being deleted.
    async fn find_account(&self, id: &AccountId) -> Result<Account, Error>;
}
