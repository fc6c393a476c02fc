//! Driven port for the account document store.
//!
//! Accounts embed both halves of the follow graph, so besides the usual
//! CRUD operations the store exposes single-document set mutations
//! (`add_relation` / `remove_relation`). Each of those calls must be atomic
//! for the one document it touches; coordinating the two halves of an edge is
//! the relationship graph engine's job.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, AccountStatus, Email, RelationSide};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account store adapters.
    pub enum AccountRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "account store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account store query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } =>
            "an account already exists for {email}",
        /// The addressed account document does not exist.
        MissingAccount { id: AccountId } =>
            "account {id} does not exist",
    }
}

/// Persistence contract for account documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a newly registered account.
    ///
    /// Fails with [`AccountRepositoryError::DuplicateEmail`] when the email is
    /// already taken.
    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError>;

    /// Fetch an account by id, including accounts marked as deleting.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Fetch an account by its normalised email.
    async fn find_by_email(&self, email: &Email)
    -> Result<Option<Account>, AccountRepositoryError>;

    /// List every stored account ordered by creation time.
    async fn list(&self) -> Result<Vec<Account>, AccountRepositoryError>;

    /// Change the lifecycle status of an account.
    async fn set_status(
        &self,
        id: &AccountId,
        status: AccountStatus,
    ) -> Result<(), AccountRepositoryError>;

    /// Add `other` to the `side` set of `owner`.
    ///
    /// Returns `true` when the set changed and `false` when `other` was
    /// already present. Fails with [`AccountRepositoryError::MissingAccount`]
    /// when `owner` does not exist.
    async fn add_relation(
        &self,
        owner: &AccountId,
        side: RelationSide,
        other: &AccountId,
    ) -> Result<bool, AccountRepositoryError>;

    /// Remove `other` from the `side` set of `owner`.
    ///
    /// Returns `true` when the set changed. Fails with
    /// [`AccountRepositoryError::MissingAccount`] when `owner` does not exist.
    async fn remove_relation(
        &self,
        owner: &AccountId,
        side: RelationSide,
        other: &AccountId,
    ) -> Result<bool, AccountRepositoryError>;

    /// Ids of every account whose `followers` or `following` mention `id`.
    async fn find_referencing(
        &self,
        id: &AccountId,
    ) -> Result<Vec<AccountId>, AccountRepositoryError>;

    /// Delete the account document. Returns `false` when it was already gone.
    async fn delete(&self, id: &AccountId) -> Result<bool, AccountRepositoryError>;
}
