//! Driving port for writing posts.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, Post};

/// Write-side post use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Publish a post authored by `author`.
    async fn create_post(&self, author: AccountId, text: String) -> Result<Post, Error>;
}
