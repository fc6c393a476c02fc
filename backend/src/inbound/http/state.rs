//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::SocialServices;
use crate::domain::ports::{
    AccountDeletionCommand, AccountRegistration, AccountsQuery, LoginService, PostCommand,
    PostQuery, ProfileCommand, ProfileQuery, RelationshipCommand, RelationshipQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn AccountRegistration>,
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountsQuery>,
    pub relationships: Arc<dyn RelationshipCommand>,
    pub relationships_query: Arc<dyn RelationshipQuery>,
    pub deletion: Arc<dyn AccountDeletionCommand>,
    pub profiles: Arc<dyn ProfileCommand>,
    pub profiles_query: Arc<dyn ProfileQuery>,
    pub posts: Arc<dyn PostCommand>,
    pub posts_query: Arc<dyn PostQuery>,
}

impl HttpState {
    /// Expose each service in `services` through its driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use social_backend::domain::{Repositories, SocialServices};
    /// use social_backend::inbound::http::state::HttpState;
    /// use social_backend::outbound::memory::{
    ///     InMemoryAccountRepository, InMemoryPostRepository, InMemoryProfileRepository,
    /// };
    /// use social_backend::outbound::security::Argon2Hasher;
    ///
    /// let services = SocialServices::new(Repositories {
    ///     accounts: Arc::new(InMemoryAccountRepository::new()),
    ///     profiles: Arc::new(InMemoryProfileRepository::new()),
    ///     posts: Arc::new(InMemoryPostRepository::new()),
    ///     hasher: Arc::new(Argon2Hasher::new()),
    /// });
    /// let state = HttpState::new(&services);
    /// let _login = state.login.clone();
    /// ```
    pub fn new(services: &SocialServices) -> Self {
        Self {
            registration: services.accounts.clone(),
            login: services.accounts.clone(),
            accounts: services.accounts.clone(),
            relationships: services.graph.clone(),
            relationships_query: services.graph.clone(),
            deletion: services.deletion.clone(),
            profiles: services.profiles.clone(),
            profiles_query: services.profiles.clone(),
            posts: services.posts.clone(),
            posts_query: services.posts.clone(),
        }
    }
}
