//! Relationship graph types shared by the engine, the deletion coordinator,
//! and the reconciliation sweep.

use serde_json::json;

use super::ports::{AccountRepository, AccountRepositoryError};
use super::{Account, AccountId, Error, RelationSide};

/// Failures of relationship operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelationshipError {
    /// One of the accounts does not exist or is being deleted.
    #[error("account {id} not found")]
    NotFound {
        /// The missing account.
        id: AccountId,
    },
    /// Actor and target are the same account.
    #[error("an account cannot follow itself")]
    SelfRelationship,
    /// The edge already exists.
    #[error("account {actor} already follows {target}")]
    AlreadyFollowing {
        /// Follower.
        actor: AccountId,
        /// Followee.
        target: AccountId,
    },
    /// The edge does not exist.
    #[error("account {actor} does not follow {target}")]
    NotFollowing {
        /// Follower.
        actor: AccountId,
        /// Followee.
        target: AccountId,
    },
    /// Only one half of the edge was stored. The stray half has been removed
    /// (or left for the reconciliation sweep) and the caller may retry.
    #[error("relationship between {actor} and {target} was inconsistent")]
    InconsistentState {
        /// Follower.
        actor: AccountId,
        /// Followee.
        target: AccountId,
    },
    /// The account store failed; any partial write was compensated.
    #[error("account store unavailable: {message}")]
    StorageUnavailable {
        /// Adapter failure description.
        message: String,
    },
}

impl RelationshipError {
    /// Construct [`Self::StorageUnavailable`].
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }
}

impl From<AccountRepositoryError> for RelationshipError {
    fn from(err: AccountRepositoryError) -> Self {
        match err {
            AccountRepositoryError::MissingAccount { id } => Self::NotFound { id },
            other => Self::storage_unavailable(other.to_string()),
        }
    }
}

impl From<RelationshipError> for Error {
    fn from(err: RelationshipError) -> Self {
        match &err {
            RelationshipError::NotFound { id } => Error::not_found(err.to_string())
                .with_details(json!({ "code": "account_not_found", "id": id })),
            RelationshipError::SelfRelationship => Error::invalid_request(err.to_string())
                .with_details(json!({ "code": "self_relationship" })),
            RelationshipError::AlreadyFollowing { .. } => Error::conflict(err.to_string())
                .with_details(json!({ "code": "already_following" })),
            RelationshipError::NotFollowing { .. } => Error::conflict(err.to_string())
                .with_details(json!({ "code": "not_following" })),
            RelationshipError::InconsistentState { .. } => Error::internal(err.to_string())
                .with_details(json!({ "code": "inconsistent_state", "retryable": true })),
            RelationshipError::StorageUnavailable { .. } => {
                Error::service_unavailable("account store unavailable")
            }
        }
    }
}

/// Followers and following of one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipSummary {
    /// The account described.
    pub account_id: AccountId,
    /// Accounts following `account_id`, sorted.
    pub followers: Vec<AccountId>,
    /// Accounts `account_id` follows, sorted.
    pub following: Vec<AccountId>,
}

impl RelationshipSummary {
    /// Snapshot the relationship sets of `account`.
    pub fn of(account: &Account) -> Self {
        Self {
            account_id: account.id,
            followers: account.followers.iter().copied().collect(),
            following: account.following.iter().copied().collect(),
        }
    }

    /// Number of followers.
    pub fn follower_count(&self) -> usize {
        self.followers.len()
    }

    /// Number of followed accounts.
    pub fn following_count(&self) -> usize {
        self.following.len()
    }
}

/// Outcome of a cascade deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionReport {
    /// Posts removed with the account.
    pub posts_removed: usize,
    /// Whether a profile existed and was removed.
    pub profile_removed: bool,
    /// Relationship entries removed from other accounts.
    pub references_removed: usize,
}

/// Which halves of the edge `actor -> target` are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EdgeState {
    /// `actor` is in `target.followers`.
    pub in_followers: bool,
    /// `target` is in `actor.following`.
    pub in_following: bool,
}

impl EdgeState {
    pub(crate) fn observe(actor: &Account, target: &Account) -> Self {
        Self {
            in_followers: target.is_followed_by(&actor.id),
            in_following: actor.follows(&target.id),
        }
    }

    pub(crate) fn is_half(self) -> bool {
        self.in_followers != self.in_following
    }
}

/// Remove whichever half of `actor -> target` is stored without its mirror.
///
/// Returns `true` when a stray half was removed. Callers must hold the pair
/// lock for `(actor, target)`.
pub(crate) async fn remove_half_edge<R>(
    accounts: &R,
    actor: &Account,
    target: &Account,
) -> Result<bool, AccountRepositoryError>
where
    R: AccountRepository + ?Sized,
{
    let state = EdgeState::observe(actor, target);
    if !state.is_half() {
        return Ok(false);
    }
    if state.in_followers {
        accounts
            .remove_relation(&target.id, RelationSide::Followers, &actor.id)
            .await
    } else {
        accounts
            .remove_relation(&actor.id, RelationSide::Following, &target.id)
            .await
    }
}
