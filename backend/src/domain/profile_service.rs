//! Profile create/update and lookup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::account_service::map_account_repository_error;
use super::ports::{
    AccountRepository, ProfileCommand, ProfileQuery, ProfileRepository, ProfileRepositoryError,
    ProfileView,
};
use super::{Account, AccountId, Error, ErrorCode, Profile, ProfileDraft};

/// Implements the profile driving ports.
#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl ProfileService {
    /// Create a new service.
    pub fn new(profiles: Arc<dyn ProfileRepository>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { profiles, accounts }
    }

    async fn active_owner(&self, id: &AccountId) -> Result<Account, Error> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(map_account_repository_error)?
            .filter(Account::is_active)
            .ok_or_else(|| Error::not_found(format!("account {id} not found")))
    }
}

fn map_profile_error(error: ProfileRepositoryError) -> Error {
    match error {
        ProfileRepositoryError::Connection { message } => {
            tracing::warn!(%message, "profile store connection failed");
            Error::service_unavailable("profile store unavailable")
        }
        ProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile store error: {message}"))
        }
    }
}

#[async_trait]
impl ProfileCommand for ProfileService {
    async fn save_profile(&self, account: AccountId, draft: ProfileDraft) -> Result<Profile, Error> {
        let profile = Profile::from_draft(account, draft).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "code": "invalid_profile" }))
        })?;
        self.active_owner(&account).await?;
        self.profiles
            .upsert(&profile)
            .await
            .map_err(map_profile_error)?;
        // Re-read the owner so a deletion racing the upsert cannot leave the
        // profile behind.
        if let Err(err) = self.active_owner(&account).await {
            if err.code() == ErrorCode::NotFound {
                self.profiles
                    .delete_by_account(&account)
                    .await
                    .map_err(map_profile_error)?;
                tracing::info!(%account, "discarded profile written during account deletion");
            }
            return Err(err);
        }
        Ok(profile)
    }
}

#[async_trait]
impl ProfileQuery for ProfileService {
    async fn list_profiles(&self) -> Result<Vec<ProfileView>, Error> {
        let owners: HashMap<AccountId, Account> = self
            .accounts
            .list()
            .await
            .map_err(map_account_repository_error)?
            .into_iter()
            .filter(Account::is_active)
            .map(|account| (account.id, account))
            .collect();
        let profiles = self.profiles.list().await.map_err(map_profile_error)?;
        Ok(profiles
            .into_iter()
            .filter_map(|profile| {
                let owner = owners.get(&profile.account_id)?;
                Some(ProfileView {
                    display_name: owner.display_name.clone(),
                    profile,
                })
            })
            .collect())
    }

    async fn profile_for(&self, account: &AccountId) -> Result<ProfileView, Error> {
        let owner = self.active_owner(account).await?;
        let profile = self
            .profiles
            .find_by_account(account)
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| Error::not_found("there is no profile for this user"))?;
        Ok(ProfileView {
            profile,
            display_name: owner.display_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use crate::domain::ports::{MockAccountRepository, MockProfileRepository};
    use crate::domain::test_support::account;
    use rstest::rstest;

    fn draft() -> ProfileDraft {
        ProfileDraft {
            bio: "Analyst".to_owned(),
            status: "Engineer".to_owned(),
            location: None,
        }
    }

    fn accounts_with(owner: Option<Account>) -> MockAccountRepository {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(owner.clone()));
        repo
    }

    #[rstest]
    #[tokio::test]
    async fn save_upserts_valid_profile() {
        let owner = account("ada");
        let id = owner.id;
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_upsert()
            .withf(move |profile| profile.account_id == id)
            .times(1)
            .returning(|_| Ok(()));
        let service = ProfileService::new(Arc::new(profiles), Arc::new(accounts_with(Some(owner))));

        let saved = service.save_profile(id, draft()).await.expect("saved");

        assert_eq!(saved.status, "Engineer");
    }

    #[rstest]
    #[tokio::test]
    async fn save_rejects_invalid_draft_without_writing() {
        let mut profiles = MockProfileRepository::new();
        profiles.expect_upsert().never();
        let service = ProfileService::new(
            Arc::new(profiles),
            Arc::new(MockAccountRepository::new()),
        );

        let err = service
            .save_profile(AccountId::random(), ProfileDraft::default())
            .await
            .expect_err("invalid");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn save_for_missing_account_is_not_found() {
        let mut profiles = MockProfileRepository::new();
        profiles.expect_upsert().never();
        let service = ProfileService::new(Arc::new(profiles), Arc::new(accounts_with(None)));

        let err = service
            .save_profile(AccountId::random(), draft())
            .await
            .expect_err("missing");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn profile_is_removed_when_owner_leaves_during_upsert() {
        let owner = account("ada");
        let id = owner.id;
        let lookups = AtomicUsize::new(0);
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_id().times(2).returning(move |_| {
            let first = lookups.fetch_add(1, Ordering::SeqCst) == 0;
            Ok(first.then(|| owner.clone()))
        });
        let mut profiles = MockProfileRepository::new();
        profiles.expect_upsert().times(1).returning(|_| Ok(()));
        profiles
            .expect_delete_by_account()
            .withf(move |account_id| *account_id == id)
            .times(1)
            .returning(|_| Ok(true));
        let service = ProfileService::new(Arc::new(profiles), Arc::new(accounts));

        let err = service.save_profile(id, draft()).await.expect_err("owner gone");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn profile_for_joins_display_name() {
        let owner = account("ada");
        let id = owner.id;
        let stored = Profile::from_draft(id, draft()).expect("profile");
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_by_account()
            .returning(move |_| Ok(Some(stored.clone())));
        let service = ProfileService::new(Arc::new(profiles), Arc::new(accounts_with(Some(owner))));

        let view = service.profile_for(&id).await.expect("found");

        assert_eq!(view.display_name.as_ref(), "ada");
        assert_eq!(view.profile.account_id, id);
    }

    #[rstest]
    #[tokio::test]
    async fn list_skips_profiles_without_active_owner() {
        let owner = account("ada");
        let kept = Profile::from_draft(owner.id, draft()).expect("profile");
        let orphan = Profile::from_draft(AccountId::random(), draft()).expect("profile");
        let listed_owner = owner.clone();
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_list()
            .returning(move || Ok(vec![listed_owner.clone()]));
        let all = vec![kept.clone(), orphan];
        let mut profiles = MockProfileRepository::new();
        profiles.expect_list().returning(move || Ok(all.clone()));
        let service = ProfileService::new(Arc::new(profiles), Arc::new(accounts));

        let views = service.list_profiles().await.expect("list");

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].profile, kept);
    }
}
