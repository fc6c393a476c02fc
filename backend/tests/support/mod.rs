//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! each suite pulls in this module and uses the subset it needs.
#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use social_backend::domain::ports::{
    AccountRegistration, AccountRepository, AccountRepositoryError, CredentialHasher,
    CredentialHasherError, PostRepository, PostRepositoryError, ProfileRepository,
    ProfileRepositoryError,
};
use social_backend::domain::{
    Account, AccountId, AccountStatus, CredentialHash, Email, Post, Profile, Registration,
    RelationSide, Repositories, SocialServices,
};
use social_backend::outbound::memory::{
    InMemoryAccountRepository, InMemoryPostRepository, InMemoryProfileRepository,
};
use tokio::sync::Notify;

/// Reversible hasher so suites do not pay for Argon2 on every registration.
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<CredentialHash, CredentialHasherError> {
        Ok(CredentialHash::new(format!("plain:{password}")))
    }

    fn verify(&self, password: &str, hash: &CredentialHash) -> Result<bool, CredentialHasherError> {
        Ok(hash.expose() == format!("plain:{password}"))
    }
}

/// In-memory account store with switchable faults on relationship writes.
///
/// The engine writes `target.followers` first and `actor.following` second,
/// so `fail_add_following` fails the second write of a follow and
/// `fail_remove_followers` fails its compensation.
#[derive(Default)]
pub struct FlakyAccounts {
    inner: InMemoryAccountRepository,
    fail_add_following: AtomicBool,
    fail_remove_followers: AtomicBool,
    stall_add_following: AtomicBool,
    stalled: Notify,
    released: Notify,
}

impl FlakyAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_add_following(&self, on: bool) {
        self.fail_add_following.store(on, Ordering::SeqCst);
    }

    pub fn fail_remove_followers(&self, on: bool) {
        self.fail_remove_followers.store(on, Ordering::SeqCst);
    }

    /// Park the next `following` insert until [`Self::release`] is called.
    pub fn stall_add_following(&self) {
        self.stall_add_following.store(true, Ordering::SeqCst);
    }

    pub async fn wait_until_stalled(&self) {
        self.stalled.notified().await;
    }

    pub fn release(&self) {
        self.released.notify_one();
    }
}

fn injected() -> AccountRepositoryError {
    AccountRepositoryError::connection("injected fault")
}

#[async_trait]
impl AccountRepository for FlakyAccounts {
    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        self.inner.insert(account).await
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        self.inner.find_by_email(email).await
    }

    async fn list(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        self.inner.list().await
    }

    async fn set_status(
        &self,
        id: &AccountId,
        status: AccountStatus,
    ) -> Result<(), AccountRepositoryError> {
        self.inner.set_status(id, status).await
    }

    async fn add_relation(
        &self,
        owner: &AccountId,
        side: RelationSide,
        other: &AccountId,
    ) -> Result<bool, AccountRepositoryError> {
        if side == RelationSide::Following {
            if self.fail_add_following.load(Ordering::SeqCst) {
                return Err(injected());
            }
            if self.stall_add_following.swap(false, Ordering::SeqCst) {
                self.stalled.notify_one();
                self.released.notified().await;
            }
        }
        self.inner.add_relation(owner, side, other).await
    }

    async fn remove_relation(
        &self,
        owner: &AccountId,
        side: RelationSide,
        other: &AccountId,
    ) -> Result<bool, AccountRepositoryError> {
        if side == RelationSide::Followers && self.fail_remove_followers.load(Ordering::SeqCst) {
            return Err(injected());
        }
        self.inner.remove_relation(owner, side, other).await
    }

    async fn find_referencing(
        &self,
        id: &AccountId,
    ) -> Result<Vec<AccountId>, AccountRepositoryError> {
        self.inner.find_referencing(id).await
    }

    async fn delete(&self, id: &AccountId) -> Result<bool, AccountRepositoryError> {
        self.inner.delete(id).await
    }
}

/// A one-shot gate that parks a write until the test releases it.
#[derive(Default)]
pub struct WriteGate {
    armed: AtomicBool,
    stalled: Notify,
    released: Notify,
}

impl WriteGate {
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    pub async fn wait_until_stalled(&self) {
        self.stalled.notified().await;
    }

    pub fn release(&self) {
        self.released.notify_one();
    }

    async fn pass(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.stalled.notify_one();
            self.released.notified().await;
        }
    }
}

/// In-memory post and profile stores whose writes can be held at a gate.
#[derive(Default)]
pub struct GatedContent {
    pub posts: InMemoryPostRepository,
    pub profiles: InMemoryProfileRepository,
    pub post_gate: WriteGate,
    pub profile_gate: WriteGate,
}

#[async_trait]
impl PostRepository for GatedContent {
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        self.post_gate.pass().await;
        self.posts.insert(post).await
    }

    async fn list_by_author(&self, author_id: &AccountId) -> Result<Vec<Post>, PostRepositoryError> {
        self.posts.list_by_author(author_id).await
    }

    async fn delete_by_author(&self, author_id: &AccountId) -> Result<usize, PostRepositoryError> {
        self.posts.delete_by_author(author_id).await
    }
}

#[async_trait]
impl ProfileRepository for GatedContent {
    async fn upsert(&self, profile: &Profile) -> Result<(), ProfileRepositoryError> {
        self.profile_gate.pass().await;
        self.profiles.upsert(profile).await
    }

    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        self.profiles.find_by_account(account_id).await
    }

    async fn list(&self) -> Result<Vec<Profile>, ProfileRepositoryError> {
        self.profiles.list().await
    }

    async fn delete_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<bool, ProfileRepositoryError> {
        self.profiles.delete_by_account(account_id).await
    }
}

/// Services wired over [`GatedContent`] and an in-memory account store.
pub struct GatedHarness {
    pub content: Arc<GatedContent>,
    pub services: SocialServices,
}

impl GatedHarness {
    pub fn new() -> Self {
        let content = Arc::new(GatedContent::default());
        let services = SocialServices::new(Repositories {
            accounts: Arc::new(InMemoryAccountRepository::new()),
            profiles: content.clone(),
            posts: content.clone(),
            hasher: Arc::new(PlainHasher),
        });
        Self { content, services }
    }

    pub async fn register(&self, name: &str) -> AccountId {
        let registration =
            Registration::try_from_parts(name, &format!("{name}@example.com"), "secret1")
                .expect("valid registration");
        self.services
            .accounts
            .register(registration)
            .await
            .expect("registration succeeds")
            .id
    }
}

/// A service graph over in-memory stores and the supplied account store.
pub struct Harness {
    pub accounts: Arc<dyn AccountRepository>,
    pub profiles: Arc<InMemoryProfileRepository>,
    pub posts: Arc<InMemoryPostRepository>,
    pub services: SocialServices,
}

impl Harness {
    pub fn with_accounts(accounts: Arc<dyn AccountRepository>) -> Self {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let posts = Arc::new(InMemoryPostRepository::new());
        let services = SocialServices::new(Repositories {
            accounts: Arc::clone(&accounts),
            profiles: profiles.clone(),
            posts: posts.clone(),
            hasher: Arc::new(PlainHasher),
        });
        Self {
            accounts,
            profiles,
            posts,
            services,
        }
    }

    pub fn in_memory() -> Self {
        Self::with_accounts(Arc::new(InMemoryAccountRepository::new()))
    }

    pub async fn register(&self, name: &str) -> AccountId {
        let registration =
            Registration::try_from_parts(name, &format!("{name}@example.com"), "secret1")
                .expect("valid registration");
        self.services
            .accounts
            .register(registration)
            .await
            .expect("registration succeeds")
            .id
    }

    pub async fn account(&self, id: &AccountId) -> Option<Account> {
        self.accounts.find_by_id(id).await.expect("store readable")
    }

    /// Assert every edge is mirrored and no account references itself or a
    /// missing account.
    pub async fn assert_symmetric(&self) {
        let all = self.accounts.list().await.expect("store readable");
        for account in &all {
            assert!(!account.follows(&account.id), "{} follows itself", account.id);
            for followee in &account.following {
                let other = all
                    .iter()
                    .find(|doc| doc.id == *followee)
                    .unwrap_or_else(|| panic!("{} follows missing {followee}", account.id));
                assert!(
                    other.is_followed_by(&account.id),
                    "{} -> {followee} has no mirror",
                    account.id
                );
            }
            for follower in &account.followers {
                let other = all
                    .iter()
                    .find(|doc| doc.id == *follower)
                    .unwrap_or_else(|| panic!("{} followed by missing {follower}", account.id));
                assert!(
                    other.follows(&account.id),
                    "{follower} -> {} has no mirror",
                    account.id
                );
            }
        }
    }

    /// Poll until `check` holds, failing after one second.
    pub async fn eventually<F, Fut>(&self, mut check: F)
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
        while !check().await {
            assert!(
                tokio::time::Instant::now() < deadline,
                "condition not reached in time"
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}
