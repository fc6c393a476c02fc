//! Driving port for reading posts.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, Post};

/// Read-side post use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostQuery: Send + Sync {
    /// Posts by `author`, newest first; not found when the author is missing.
    async fn posts_by(&self, author: &AccountId) -> Result<Vec<Post>, Error>;
}
