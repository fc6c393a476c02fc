//! In-memory [`AccountRepository`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, AccountId, AccountStatus, Email, RelationSide};

/// Account documents keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    docs: Mutex<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn docs(&self) -> MutexGuard<'_, HashMap<AccountId, Account>> {
        self.docs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate(
        &self,
        owner: &AccountId,
        apply: impl FnOnce(&mut Account) -> bool,
    ) -> Result<bool, AccountRepositoryError> {
        let mut docs = self.docs();
        let doc = docs
            .get_mut(owner)
            .ok_or_else(|| AccountRepositoryError::missing_account(*owner))?;
        Ok(apply(doc))
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut docs = self.docs();
        if docs.values().any(|doc| doc.email == account.email) {
            return Err(AccountRepositoryError::duplicate_email(account.email.as_ref()));
        }
        docs.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(self.docs().get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(self.docs().values().find(|doc| doc.email == *email).cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        let mut all: Vec<Account> = self.docs().values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn set_status(
        &self,
        id: &AccountId,
        status: AccountStatus,
    ) -> Result<(), AccountRepositoryError> {
        self.mutate(id, |doc| {
            doc.status = status;
            true
        })
        .map(|_| ())
    }

    async fn add_relation(
        &self,
        owner: &AccountId,
        side: RelationSide,
        other: &AccountId,
    ) -> Result<bool, AccountRepositoryError> {
        self.mutate(owner, |doc| doc.relation_mut(side).insert(*other))
    }

    async fn remove_relation(
        &self,
        owner: &AccountId,
        side: RelationSide,
        other: &AccountId,
    ) -> Result<bool, AccountRepositoryError> {
        self.mutate(owner, |doc| doc.relation_mut(side).remove(other))
    }

    async fn find_referencing(
        &self,
        id: &AccountId,
    ) -> Result<Vec<AccountId>, AccountRepositoryError> {
        Ok(self
            .docs()
            .values()
            .filter(|doc| doc.is_followed_by(id) || doc.follows(id))
            .map(|doc| doc.id)
            .collect())
    }

    async fn delete(&self, id: &AccountId) -> Result<bool, AccountRepositoryError> {
        Ok(self.docs().remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CredentialHash, DisplayName};
    use rstest::{fixture, rstest};

    fn account(name: &str) -> Account {
        Account::register(
            Email::new(format!("{name}@example.com")).expect("email"),
            DisplayName::new(name).expect("name"),
            CredentialHash::new("hash"),
        )
    }

    #[fixture]
    fn store() -> InMemoryAccountRepository {
        InMemoryAccountRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_duplicate_email(store: InMemoryAccountRepository) {
        store.insert(&account("ada")).await.expect("first insert");
        let err = store.insert(&account("ada")).await.expect_err("duplicate");
        assert_eq!(err, AccountRepositoryError::duplicate_email("ada@example.com"));
    }

    #[rstest]
    #[tokio::test]
    async fn relation_updates_report_change(store: InMemoryAccountRepository) {
        let (ada, bob) = (account("ada"), account("bob"));
        store.insert(&ada).await.expect("insert");

        let added = store
            .add_relation(&ada.id, RelationSide::Following, &bob.id)
            .await
            .expect("add");
        let again = store
            .add_relation(&ada.id, RelationSide::Following, &bob.id)
            .await
            .expect("add again");
        let removed = store
            .remove_relation(&ada.id, RelationSide::Following, &bob.id)
            .await
            .expect("remove");

        assert!(added && !again && removed);
    }

    #[rstest]
    #[tokio::test]
    async fn relation_update_on_missing_owner_fails(store: InMemoryAccountRepository) {
        let ghost = AccountId::random();
        let err = store
            .add_relation(&ghost, RelationSide::Followers, &AccountId::random())
            .await
            .expect_err("missing owner");
        assert_eq!(err, AccountRepositoryError::missing_account(ghost));
    }

    #[rstest]
    #[tokio::test]
    async fn find_referencing_scans_both_sets(store: InMemoryAccountRepository) {
        let (ada, bob, cy) = (account("ada"), account("bob"), account("cy"));
        for doc in [&ada, &bob, &cy] {
            store.insert(doc).await.expect("insert");
        }
        store
            .add_relation(&bob.id, RelationSide::Followers, &ada.id)
            .await
            .expect("add");
        store
            .add_relation(&cy.id, RelationSide::Following, &ada.id)
            .await
            .expect("add");

        let mut holders = store.find_referencing(&ada.id).await.expect("scan");
        holders.sort();
        let mut expected = vec![bob.id, cy.id];
        expected.sort();
        assert_eq!(holders, expected);
    }
}
