//! Cascade deletion coordinator.
//!
//! Deleting an account removes its posts and profile, every reference other
//! accounts hold to it, and finally the account document. The sequence is:
//!
//! 1. mark the account `deleting` so the relationship engine refuses it;
//! 2. wait for in-flight pair operations involving it to finish;
//! 3. remove owned posts and the profile;
//! 4. under each pair lock, remove the account from the other party's sets;
//! 5. delete the account document;
//! 6. scan once more for stray references and remove them.
//!
//! Every step is idempotent, so an interrupted deletion is completed by simply
//! running it again; the reconciliation sweep does that for accounts left in
//! the `deleting` state.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::pair_locks::PairLocks;
use super::ports::{
    AccountDeletionCommand, AccountRepository, AccountRepositoryError, PostRepository,
    ProfileRepository,
};
use super::{
    AccountId, AccountStatus, DeletionReport, Error, RelationSide, RelationshipError, TraceId,
};

/// Coordinates cascade deletion across the account, profile, and post stores.
#[derive(Clone)]
pub struct AccountDeletionService {
    accounts: Arc<dyn AccountRepository>,
    profiles: Arc<dyn ProfileRepository>,
    posts: Arc<dyn PostRepository>,
    locks: PairLocks,
}

impl AccountDeletionService {
    /// Build a coordinator sharing `locks` with the relationship engine.
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        profiles: Arc<dyn ProfileRepository>,
        posts: Arc<dyn PostRepository>,
        locks: PairLocks,
    ) -> Self {
        Self {
            accounts,
            profiles,
            posts,
            locks,
        }
    }

    /// Delete `id` and everything that belongs to or refers to it.
    ///
    /// Runs on a detached task: once started, the cascade finishes even if
    /// the caller stops waiting.
    pub async fn delete(&self, id: AccountId) -> Result<DeletionReport, RelationshipError> {
        let coordinator = self.clone();
        let task = async move { coordinator.cascade(id).await };
        TraceId::spawn_in_scope(task).await.map_err(|err| {
            RelationshipError::storage_unavailable(format!("account deletion aborted: {err}"))
        })?
    }

    async fn cascade(&self, id: AccountId) -> Result<DeletionReport, RelationshipError> {
        let Some(account) = self.accounts.find_by_id(&id).await? else {
            return Err(RelationshipError::NotFound { id });
        };
        if account.status != AccountStatus::Deleting {
            self.accounts
                .set_status(&id, AccountStatus::Deleting)
                .await?;
            info!(account = %id, "account marked for deletion");
        }

        self.locks.drain(&id).await;

        let posts_removed = self
            .posts
            .delete_by_author(&id)
            .await
            .map_err(|err| RelationshipError::storage_unavailable(err.to_string()))?;
        let profile_removed = self
            .profiles
            .delete_by_account(&id)
            .await
            .map_err(|err| RelationshipError::storage_unavailable(err.to_string()))?;

        // Re-read after draining: in-flight operations may have changed the sets.
        let mut holders: BTreeSet<AccountId> = match self.accounts.find_by_id(&id).await? {
            Some(current) => current.followers.union(&current.following).copied().collect(),
            None => BTreeSet::new(),
        };
        holders.extend(self.accounts.find_referencing(&id).await?);
        holders.remove(&id);

        let mut references_removed = 0;
        for holder in &holders {
            references_removed += self.excise(*holder, id).await?;
        }

        self.accounts.delete(&id).await?;

        for holder in self.accounts.find_referencing(&id).await? {
            warn!(account = %id, %holder, "reference appeared during deletion");
            references_removed += self.excise(holder, id).await?;
        }

        let report = DeletionReport {
            posts_removed,
            profile_removed,
            references_removed,
        };
        info!(
            account = %id,
            posts = report.posts_removed,
            profile = report.profile_removed,
            references = report.references_removed,
            "account deleted"
        );
        Ok(report)
    }

    /// Remove `deleted` from both sets of `holder` under their pair lock.
    async fn excise(&self, holder: AccountId, deleted: AccountId) -> Result<usize, RelationshipError> {
        let _pair = self.locks.lock(holder, deleted).await;
        let mut removed = 0;
        for side in [RelationSide::Followers, RelationSide::Following] {
            match self.accounts.remove_relation(&holder, side, &deleted).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                // The holder vanished concurrently; nothing left to clean.
                Err(AccountRepositoryError::MissingAccount { .. }) => return Ok(removed),
                Err(err) => return Err(err.into()),
            }
        }
        Ok(removed)
    }
}

#[async_trait]
impl AccountDeletionCommand for AccountDeletionService {
    async fn delete_account(&self, account: AccountId) -> Result<DeletionReport, Error> {
        self.delete(account).await.map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "account_deletion_tests.rs"]
mod tests;
