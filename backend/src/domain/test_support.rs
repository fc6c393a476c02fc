//! Shared doubles for domain service tests.
//!
//! [`backed_accounts`] returns a mock account repository whose expectations
//! read and write a shared document map, so tests observe real state
//! transitions. [`Faults`] switches make individual writes fail on demand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::ports::{AccountRepositoryError, MockAccountRepository};
use super::{Account, AccountId, CredentialHash, DisplayName, Email, RelationSide};

pub(crate) type Docs = Arc<Mutex<HashMap<AccountId, Account>>>;

#[derive(Clone, Default)]
pub(crate) struct Faults {
    pub(crate) add_following: Arc<AtomicBool>,
    pub(crate) add_followers: Arc<AtomicBool>,
    pub(crate) remove_followers: Arc<AtomicBool>,
    pub(crate) remove_following: Arc<AtomicBool>,
}

impl Faults {
    pub(crate) fn set(flag: &AtomicBool, value: bool) {
        flag.store(value, Ordering::SeqCst);
    }

    fn trips(&self, side: RelationSide, adding: bool) -> bool {
        let flag = match (side, adding) {
            (RelationSide::Following, true) => &self.add_following,
            (RelationSide::Followers, true) => &self.add_followers,
            (RelationSide::Followers, false) => &self.remove_followers,
            (RelationSide::Following, false) => &self.remove_following,
        };
        flag.load(Ordering::SeqCst)
    }
}

pub(crate) fn account(name: &str) -> Account {
    Account::register(
        Email::new(format!("{name}@example.com")).expect("email"),
        DisplayName::new(name).expect("name"),
        CredentialHash::new("hash"),
    )
}

pub(crate) fn docs_of(accounts: impl IntoIterator<Item = Account>) -> Docs {
    Arc::new(Mutex::new(
        accounts.into_iter().map(|doc| (doc.id, doc)).collect(),
    ))
}

pub(crate) fn doc(docs: &Docs, id: &AccountId) -> Option<Account> {
    docs.lock().expect("docs lock").get(id).cloned()
}

pub(crate) fn edit(docs: &Docs, id: &AccountId, f: impl FnOnce(&mut Account)) {
    let mut docs = docs.lock().expect("docs lock");
    f(docs.get_mut(id).expect("account present"));
}

/// Panics when any stored edge lacks its mirror or points at a missing account.
pub(crate) fn assert_symmetric(docs: &Docs) {
    let docs = docs.lock().expect("docs lock");
    for doc in docs.values() {
        for followed in &doc.following {
            let peer = docs.get(followed).expect("followed account exists");
            assert!(peer.followers.contains(&doc.id), "missing follower half");
        }
        for follower in &doc.followers {
            let peer = docs.get(follower).expect("follower account exists");
            assert!(peer.following.contains(&doc.id), "missing following half");
        }
    }
}

fn mutate(
    docs: &Docs,
    owner: &AccountId,
    side: RelationSide,
    other: &AccountId,
    adding: bool,
) -> Result<bool, AccountRepositoryError> {
    let mut docs = docs.lock().expect("docs lock");
    let doc = docs
        .get_mut(owner)
        .ok_or_else(|| AccountRepositoryError::missing_account(*owner))?;
    let set = doc.relation_mut(side);
    Ok(if adding {
        set.insert(*other)
    } else {
        set.remove(other)
    })
}

pub(crate) fn backed_accounts(docs: &Docs, faults: &Faults) -> MockAccountRepository {
    let mut repo = MockAccountRepository::new();

    let reads = Arc::clone(docs);
    repo.expect_find_by_id()
        .returning(move |id| Ok(reads.lock().expect("docs lock").get(id).cloned()));

    let listing = Arc::clone(docs);
    repo.expect_list().returning(move || {
        let mut all: Vec<Account> = listing.lock().expect("docs lock").values().cloned().collect();
        all.sort_by_key(|doc| doc.created_at);
        Ok(all)
    });

    let statuses = Arc::clone(docs);
    repo.expect_set_status().returning(move |id, status| {
        let mut docs = statuses.lock().expect("docs lock");
        let doc = docs
            .get_mut(id)
            .ok_or_else(|| AccountRepositoryError::missing_account(*id))?;
        doc.status = status;
        Ok(())
    });

    let (adds, add_faults) = (Arc::clone(docs), faults.clone());
    repo.expect_add_relation().returning(move |owner, side, other| {
        if add_faults.trips(side, true) {
            return Err(AccountRepositoryError::connection("injected add failure"));
        }
        mutate(&adds, owner, side, other, true)
    });

    let (removes, remove_faults) = (Arc::clone(docs), faults.clone());
    repo.expect_remove_relation()
        .returning(move |owner, side, other| {
            if remove_faults.trips(side, false) {
                return Err(AccountRepositoryError::connection("injected remove failure"));
            }
            mutate(&removes, owner, side, other, false)
        });

    let scans = Arc::clone(docs);
    repo.expect_find_referencing().returning(move |id| {
        let docs = scans.lock().expect("docs lock");
        Ok(docs
            .values()
            .filter(|doc| doc.followers.contains(id) || doc.following.contains(id))
            .map(|doc| doc.id)
            .collect())
    });

    let deletes = Arc::clone(docs);
    repo.expect_delete()
        .returning(move |id| Ok(deletes.lock().expect("docs lock").remove(id).is_some()));

    repo
}
