//! In-memory [`ProfileRepository`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{AccountId, Profile};

/// Profiles keyed by owning account.
#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    profiles: Mutex<HashMap<AccountId, Profile>>,
}

impl InMemoryProfileRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn profiles(&self) -> MutexGuard<'_, HashMap<AccountId, Profile>> {
        self.profiles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn upsert(&self, profile: &Profile) -> Result<(), ProfileRepositoryError> {
        self.profiles().insert(profile.account_id, profile.clone());
        Ok(())
    }

    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        Ok(self.profiles().get(account_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Profile>, ProfileRepositoryError> {
        let mut all: Vec<Profile> = self.profiles().values().cloned().collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(all)
    }

    async fn delete_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<bool, ProfileRepositoryError> {
        Ok(self.profiles().remove(account_id).is_some())
    }
}
