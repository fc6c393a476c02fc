//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Account, Error, Registration};

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRegistration: Send + Sync {
    /// Register a new account.
    ///
    /// Fails with a conflict when the email is already taken.
    async fn register(&self, registration: Registration) -> Result<Account, Error>;
}
