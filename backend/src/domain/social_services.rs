//! Composition of the domain services over one set of repositories.

use std::sync::Arc;

use super::ports::{AccountRepository, CredentialHasher, PostRepository, ProfileRepository};
use super::{
    AccountDeletionService, AccountService, PairLocks, PostService, ProfileService,
    RelationshipGraph, RelationshipReconciler,
};

/// Repositories and adapters the services are built from.
#[derive(Clone)]
pub struct Repositories {
    /// Account documents.
    pub accounts: Arc<dyn AccountRepository>,
    /// Profiles.
    pub profiles: Arc<dyn ProfileRepository>,
    /// Posts.
    pub posts: Arc<dyn PostRepository>,
    /// Password hashing.
    pub hasher: Arc<dyn CredentialHasher>,
}

/// Every domain service, wired so the relationship engine, the deletion
/// coordinator, and the reconciler share one pair-lock registry.
#[derive(Clone)]
pub struct SocialServices {
    /// Registration, login, and account lookup.
    pub accounts: Arc<AccountService>,
    /// Follow and unfollow.
    pub graph: Arc<RelationshipGraph<dyn AccountRepository>>,
    /// Cascade deletion.
    pub deletion: Arc<AccountDeletionService>,
    /// Profiles.
    pub profiles: Arc<ProfileService>,
    /// Posts.
    pub posts: Arc<PostService>,
    /// Background repair.
    pub reconciler: RelationshipReconciler,
}

impl SocialServices {
    /// Build all services over `repositories`.
    pub fn new(repositories: Repositories) -> Self {
        let Repositories {
            accounts,
            profiles,
            posts,
            hasher,
        } = repositories;
        let locks = PairLocks::new();
        let deletion = AccountDeletionService::new(
            Arc::clone(&accounts),
            Arc::clone(&profiles),
            Arc::clone(&posts),
            locks.clone(),
        );
        Self {
            accounts: Arc::new(AccountService::new(Arc::clone(&accounts), hasher)),
            graph: Arc::new(RelationshipGraph::new(Arc::clone(&accounts), locks.clone())),
            reconciler: RelationshipReconciler::new(
                Arc::clone(&accounts),
                deletion.clone(),
                locks,
            ),
            deletion: Arc::new(deletion),
            profiles: Arc::new(ProfileService::new(profiles, Arc::clone(&accounts))),
            posts: Arc::new(PostService::new(posts, accounts)),
        }
    }
}
