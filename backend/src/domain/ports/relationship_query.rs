//! Driving port for reading the follow graph.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, RelationshipSummary};

/// Read-side relationship use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationshipQuery: Send + Sync {
    /// Followers and following of `account`.
    async fn relationships(&self, account: &AccountId) -> Result<RelationshipSummary, Error>;
}
