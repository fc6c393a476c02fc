//! Account registration, login, and lookup.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::ports::{
    AccountRegistration, AccountRepository, AccountRepositoryError, AccountsQuery,
    CredentialHasher, CredentialHasherError, LoginService,
};
use super::{Account, AccountId, Error, LoginCredentials, Registration};

/// Implements the account driving ports over an [`AccountRepository`] and a
/// [`CredentialHasher`].
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AccountService {
    /// Create a new service.
    pub fn new(accounts: Arc<dyn AccountRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { accounts, hasher }
    }

    async fn verify(&self, password: String, account: &Account) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let hash = account.credential_hash.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|err| Error::internal(format!("credential check aborted: {err}")))?
            .map_err(map_hasher_error)
    }
}

pub(crate) fn map_account_repository_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            tracing::warn!(%message, "account store connection failed");
            Error::service_unavailable("account store unavailable")
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account store error: {message}"))
        }
        AccountRepositoryError::DuplicateEmail { email } => {
            Error::conflict(format!("an account already exists for {email}"))
                .with_details(json!({ "code": "duplicate_email", "field": "email" }))
        }
        AccountRepositoryError::MissingAccount { id } => {
            Error::not_found(format!("account {id} not found"))
        }
    }
}

fn map_hasher_error(error: CredentialHasherError) -> Error {
    Error::internal(error.to_string())
}

#[async_trait]
impl AccountRegistration for AccountService {
    async fn register(&self, registration: Registration) -> Result<Account, Error> {
        let existing = self
            .accounts
            .find_by_email(registration.email())
            .await
            .map_err(map_account_repository_error)?;
        if existing.is_some() {
            return Err(map_account_repository_error(
                AccountRepositoryError::duplicate_email(registration.email().as_ref()),
            ));
        }

        let hasher = Arc::clone(&self.hasher);
        let password = registration.password().to_owned();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("credential hashing aborted: {err}")))?
            .map_err(map_hasher_error)?;

        let account = Account::register(
            registration.email().clone(),
            registration.display_name().clone(),
            hash,
        );
        self.accounts
            .insert(&account)
            .await
            .map_err(map_account_repository_error)?;
        info!(account = %account.id, "account registered");
        Ok(account)
    }
}

#[async_trait]
impl LoginService for AccountService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AccountId, Error> {
        let account = self
            .accounts
            .find_by_email(credentials.email())
            .await
            .map_err(map_account_repository_error)?
            .filter(Account::is_active)
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
        if self
            .verify(credentials.password().to_owned(), &account)
            .await?
        {
            Ok(account.id)
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}

#[async_trait]
impl AccountsQuery for AccountService {
    async fn list_accounts(&self) -> Result<Vec<Account>, Error> {
        let accounts = self
            .accounts
            .list()
            .await
            .map_err(map_account_repository_error)?;
        Ok(accounts.into_iter().filter(Account::is_active).collect())
    }

    async fn find_account(&self, id: &AccountId) -> Result<Account, Error> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(map_account_repository_error)?
            .filter(Account::is_active)
            .ok_or_else(|| Error::not_found(format!("account {id} not found")))
    }
}
