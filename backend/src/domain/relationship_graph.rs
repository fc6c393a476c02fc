//! Relationship graph engine.
//!
//! Owns the follow/unfollow operations over the two embedded sets of the
//! account documents. An edge `actor -> target` is stored twice
//! (`target.followers` and `actor.following`) and the engine keeps both halves
//! in agreement:
//!
//! - writes for a pair run under the pair lock, in a fixed order (target
//!   first, then actor);
//! - when the second write fails the first is compensated;
//! - a half-present edge found while locked is repaired and reported as
//!   [`RelationshipError::InconsistentState`];
//! - the locked section runs on a spawned task, so a caller that goes away
//!   mid-operation never leaves a single half behind.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::pair_locks::PairLocks;
use super::ports::{AccountRepository, AccountRepositoryError, RelationshipCommand, RelationshipQuery};
use super::relationship::{EdgeState, remove_half_edge};
use super::{Account, AccountId, Error, RelationSide, RelationshipError, RelationshipSummary, TraceId};

/// Attempts made to undo a first write before leaving it to reconciliation.
const COMPENSATION_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeChange {
    Link,
    Unlink,
}

impl EdgeChange {
    fn inverse(self) -> Self {
        match self {
            Self::Link => Self::Unlink,
            Self::Unlink => Self::Link,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Link => "follow",
            Self::Unlink => "unfollow",
        }
    }
}

/// Follow/unfollow engine over an [`AccountRepository`].
pub struct RelationshipGraph<R: ?Sized> {
    accounts: Arc<R>,
    locks: PairLocks,
}

impl<R: ?Sized> Clone for RelationshipGraph<R> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            locks: self.locks.clone(),
        }
    }
}

impl<R> RelationshipGraph<R>
where
    R: AccountRepository + ?Sized + 'static,
{
    /// Build an engine sharing `locks` with the deletion coordinator and the
    /// reconciliation sweep.
    pub fn new(accounts: Arc<R>, locks: PairLocks) -> Self {
        Self { accounts, locks }
    }

    /// Record that `actor` follows `target`.
    ///
    /// Returns the target's relationships after the change.
    pub async fn follow(
        &self,
        actor: AccountId,
        target: AccountId,
    ) -> Result<RelationshipSummary, RelationshipError> {
        self.run_detached(EdgeChange::Link, actor, target).await
    }

    /// Remove the edge `actor -> target`.
    ///
    /// Returns the target's relationships after the change.
    pub async fn unfollow(
        &self,
        actor: AccountId,
        target: AccountId,
    ) -> Result<RelationshipSummary, RelationshipError> {
        self.run_detached(EdgeChange::Unlink, actor, target).await
    }

    /// Current followers and following of `account`.
    pub async fn relationships(
        &self,
        account: AccountId,
    ) -> Result<RelationshipSummary, RelationshipError> {
        let doc = self.load_active(account).await?;
        Ok(RelationshipSummary::of(&doc))
    }

    async fn run_detached(
        &self,
        change: EdgeChange,
        actor: AccountId,
        target: AccountId,
    ) -> Result<RelationshipSummary, RelationshipError> {
        if actor == target {
            return Err(RelationshipError::SelfRelationship);
        }
        let engine = self.clone();
        let task = async move {
            let _pair = engine.locks.lock(actor, target).await;
            engine.apply(change, actor, target).await
        };
        TraceId::spawn_in_scope(task).await.map_err(|err| {
            error!(%actor, %target, error = %err, "relationship task aborted");
            RelationshipError::storage_unavailable(format!("relationship task aborted: {err}"))
        })?
    }

    async fn apply(
        &self,
        change: EdgeChange,
        actor: AccountId,
        target: AccountId,
    ) -> Result<RelationshipSummary, RelationshipError> {
        let actor_doc = self.load_active(actor).await?;
        let target_doc = self.load_active(target).await?;

        let state = EdgeState::observe(&actor_doc, &target_doc);
        if state.is_half() {
            self.repair(&actor_doc, &target_doc, state).await;
            return Err(RelationshipError::InconsistentState { actor, target });
        }
        match (change, state.in_followers) {
            (EdgeChange::Link, true) => {
                return Err(RelationshipError::AlreadyFollowing { actor, target });
            }
            (EdgeChange::Unlink, false) => {
                return Err(RelationshipError::NotFollowing { actor, target });
            }
            _ => {}
        }

        self.write_pair(change, actor, target).await?;
        debug!(%actor, %target, operation = change.as_str(), "relationship updated");

        let refreshed = self.load_active(target).await?;
        Ok(RelationshipSummary::of(&refreshed))
    }

    async fn load_active(&self, id: AccountId) -> Result<Account, RelationshipError> {
        match self.accounts.find_by_id(&id).await? {
            Some(account) if account.is_active() => Ok(account),
            _ => Err(RelationshipError::NotFound { id }),
        }
    }

    async fn repair(&self, actor: &Account, target: &Account, state: EdgeState) {
        error!(
            actor = %actor.id,
            target = %target.id,
            in_followers = state.in_followers,
            in_following = state.in_following,
            "half-present relationship detected"
        );
        match remove_half_edge(self.accounts.as_ref(), actor, target).await {
            Ok(_) => info!(actor = %actor.id, target = %target.id, "stray relationship half removed"),
            Err(err) => warn!(
                actor = %actor.id,
                target = %target.id,
                error = %err,
                "stray relationship half left for reconciliation"
            ),
        }
    }

    async fn write_pair(
        &self,
        change: EdgeChange,
        actor: AccountId,
        target: AccountId,
    ) -> Result<(), RelationshipError> {
        self.write(change, target, RelationSide::Followers, actor)
            .await?;
        if let Err(err) = self
            .write(change, actor, RelationSide::Following, target)
            .await
        {
            warn!(%actor, %target, error = %err, operation = change.as_str(), "second relationship write failed");
            self.compensate(change, actor, target).await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn compensate(&self, change: EdgeChange, actor: AccountId, target: AccountId) {
        let undo = change.inverse();
        let mut last_error = None;
        for _ in 0..COMPENSATION_ATTEMPTS {
            match self
                .write(undo, target, RelationSide::Followers, actor)
                .await
            {
                Ok(_) => {
                    info!(%actor, %target, "first relationship write compensated");
                    return;
                }
                Err(err) => last_error = Some(err),
            }
        }
        if let Some(err) = last_error {
            error!(
                %actor,
                %target,
                error = %err,
                "compensation failed; pair requires reconciliation"
            );
        }
    }

    async fn write(
        &self,
        change: EdgeChange,
        owner: AccountId,
        side: RelationSide,
        other: AccountId,
    ) -> Result<bool, AccountRepositoryError> {
        match change {
            EdgeChange::Link => self.accounts.add_relation(&owner, side, &other).await,
            EdgeChange::Unlink => self.accounts.remove_relation(&owner, side, &other).await,
        }
    }
}

#[async_trait]
impl<R> RelationshipCommand for RelationshipGraph<R>
where
    R: AccountRepository + ?Sized + 'static,
{
    async fn follow(
        &self,
        actor: AccountId,
        target: AccountId,
    ) -> Result<RelationshipSummary, Error> {
        RelationshipGraph::follow(self, actor, target)
            .await
            .map_err(Error::from)
    }

    async fn unfollow(
        &self,
        actor: AccountId,
        target: AccountId,
    ) -> Result<RelationshipSummary, Error> {
        RelationshipGraph::unfollow(self, actor, target)
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl<R> RelationshipQuery for RelationshipGraph<R>
where
    R: AccountRepository + ?Sized + 'static,
{
    async fn relationships(&self, account: &AccountId) -> Result<RelationshipSummary, Error> {
        RelationshipGraph::relationships(self, *account)
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "relationship_graph_tests.rs"]
mod tests;
