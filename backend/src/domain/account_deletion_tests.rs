//! Tests for the cascade deletion coordinator.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockPostRepository, MockProfileRepository, PostRepositoryError,
};
use crate::domain::test_support::{
    Docs, Faults, account, assert_symmetric, backed_accounts, doc, docs_of, edit,
};
use crate::domain::{Account, RelationshipGraph};

fn link(docs: &Docs, follower: &Account, followee: &Account) {
    edit(docs, &follower.id, |doc| {
        doc.following.insert(followee.id);
    });
    edit(docs, &followee.id, |doc| {
        doc.followers.insert(follower.id);
    });
}

fn owned_stores(posts: usize, profile: bool) -> (MockProfileRepository, MockPostRepository) {
    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_delete_by_account()
        .returning(move |_| Ok(profile));
    let mut post_repo = MockPostRepository::new();
    post_repo
        .expect_delete_by_author()
        .returning(move |_| Ok(posts));
    (profiles, post_repo)
}

fn coordinator(
    docs: &Docs,
    faults: &Faults,
    profiles: MockProfileRepository,
    posts: MockPostRepository,
    locks: PairLocks,
) -> AccountDeletionService {
    AccountDeletionService::new(
        Arc::new(backed_accounts(docs, faults)),
        Arc::new(profiles),
        Arc::new(posts),
        locks,
    )
}

#[rstest]
#[tokio::test]
async fn cascade_removes_document_and_every_reference() {
    let (alice, bob, carol) = (account("alice"), account("bob"), account("carol"));
    let docs = docs_of([alice.clone(), bob.clone(), carol.clone()]);
    link(&docs, &bob, &alice);
    link(&docs, &alice, &carol);
    link(&docs, &bob, &carol);
    let (profiles, posts) = owned_stores(2, true);
    let service = coordinator(&docs, &Faults::default(), profiles, posts, PairLocks::new());

    let report = service.delete(alice.id).await.expect("deletion succeeds");

    assert_eq!(
        report,
        DeletionReport {
            posts_removed: 2,
            profile_removed: true,
            references_removed: 2,
        }
    );
    assert!(doc(&docs, &alice.id).is_none());
    let bob_now = doc(&docs, &bob.id).expect("bob remains");
    assert!(!bob_now.follows(&alice.id));
    assert!(bob_now.follows(&carol.id));
    assert!(!doc(&docs, &carol.id).expect("carol remains").is_followed_by(&alice.id));
    assert_symmetric(&docs);
}

#[rstest]
#[tokio::test]
async fn missing_account_is_not_found() {
    let docs = docs_of([]);
    let service = coordinator(
        &docs,
        &Faults::default(),
        MockProfileRepository::new(),
        MockPostRepository::new(),
        PairLocks::new(),
    );
    let ghost = AccountId::random();

    let result = service.delete(ghost).await;

    assert_eq!(result, Err(RelationshipError::NotFound { id: ghost }));
}

#[rstest]
#[tokio::test]
async fn stray_half_reference_is_removed() {
    let (alice, bob) = (account("alice"), account("bob"));
    let docs = docs_of([alice.clone(), bob.clone()]);
    // Bob lists Alice as a follower but Alice's document does not mirror it.
    edit(&docs, &bob.id, |doc| {
        doc.followers.insert(alice.id);
    });
    let (profiles, posts) = owned_stores(0, false);
    let service = coordinator(&docs, &Faults::default(), profiles, posts, PairLocks::new());

    service.delete(alice.id).await.expect("deletion succeeds");

    assert!(doc(&docs, &bob.id).expect("bob").followers.is_empty());
}

#[rstest]
#[tokio::test]
async fn interrupted_deletion_resumes_on_retry() {
    let (alice, bob) = (account("alice"), account("bob"));
    let docs = docs_of([alice.clone(), bob.clone()]);
    link(&docs, &bob, &alice);

    let mut profiles = MockProfileRepository::new();
    profiles.expect_delete_by_account().never();
    let mut posts = MockPostRepository::new();
    posts
        .expect_delete_by_author()
        .times(1)
        .returning(|_| Err(PostRepositoryError::connection("down")));
    let failing = coordinator(&docs, &Faults::default(), profiles, posts, PairLocks::new());

    let first = failing.delete(alice.id).await;
    assert!(matches!(
        first,
        Err(RelationshipError::StorageUnavailable { .. })
    ));
    assert_eq!(
        doc(&docs, &alice.id).expect("still stored").status,
        AccountStatus::Deleting
    );

    let (profiles, posts) = owned_stores(0, false);
    let retry = coordinator(&docs, &Faults::default(), profiles, posts, PairLocks::new());
    retry.delete(alice.id).await.expect("retry completes");

    assert!(doc(&docs, &alice.id).is_none());
    assert!(doc(&docs, &bob.id).expect("bob").following.is_empty());
}

#[rstest]
#[tokio::test]
async fn marked_account_is_refused_by_the_engine() {
    let (alice, bob) = (account("alice"), account("bob"));
    let docs = docs_of([alice.clone(), bob.clone()]);
    edit(&docs, &alice.id, |doc| doc.status = AccountStatus::Deleting);
    let graph = RelationshipGraph::new(
        Arc::new(backed_accounts(&docs, &Faults::default())),
        PairLocks::new(),
    );

    let result = graph.follow(bob.id, alice.id).await;

    assert_eq!(result, Err(RelationshipError::NotFound { id: alice.id }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn deletion_racing_follows_leaves_no_dangling_reference() {
    let target = account("target");
    let others: Vec<Account> = (0..8).map(|n| account(&format!("user{n}"))).collect();
    let docs = docs_of(std::iter::once(target.clone()).chain(others.iter().cloned()));
    let faults = Faults::default();
    let locks = PairLocks::new();
    let graph = RelationshipGraph::new(Arc::new(backed_accounts(&docs, &faults)), locks.clone());
    let (profiles, posts) = owned_stores(0, false);
    let service = coordinator(&docs, &faults, profiles, posts, locks);

    let mut follows = Vec::new();
    for other in &others {
        let (graph, actor) = (graph.clone(), other.id);
        let target = target.id;
        follows.push(tokio::spawn(async move {
            let _ = graph.follow(actor, target).await;
            let _ = graph.follow(target, actor).await;
        }));
    }
    service.delete(target.id).await.expect("deletion succeeds");
    for task in follows {
        task.await.expect("follow task");
    }

    assert!(doc(&docs, &target.id).is_none());
    for other in &others {
        let current = doc(&docs, &other.id).expect("other remains");
        assert!(!current.follows(&target.id));
        assert!(!current.is_followed_by(&target.id));
    }
    assert_symmetric(&docs);
}
