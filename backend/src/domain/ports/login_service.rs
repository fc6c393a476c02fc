//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing store or hashing scheme.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated account id.
    ///
    /// Unknown emails and wrong passwords produce the same unauthorised error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AccountId, Error>;
}
