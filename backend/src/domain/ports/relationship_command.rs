//! Driving port for mutating the follow graph.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, RelationshipSummary};

/// Follow and unfollow use cases.
///
/// Both operations return the target's relationship summary after the change
/// so clients can refresh follower counts without a second request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationshipCommand: Send + Sync {
    /// Record that `actor` follows `target`.
    async fn follow(&self, actor: AccountId, target: AccountId)
    -> Result<RelationshipSummary, Error>;

    /// Remove the edge `actor` follows `target`.
    async fn unfollow(
        &self,
        actor: AccountId,
        target: AccountId,
    ) -> Result<RelationshipSummary, Error>;
}
