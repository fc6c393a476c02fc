//! Driven port for post persistence.

use async_trait::async_trait;

use crate::domain::{AccountId, Post};

use super::define_port_error;

define_port_error! {
    /// Errors raised by post store adapters.
    pub enum PostRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "post store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "post store query failed: {message}",
    }
}

/// Persistence contract for posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Store a new post.
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError>;

    /// Posts written by `author_id`, newest first.
    async fn list_by_author(&self, author_id: &AccountId) -> Result<Vec<Post>, PostRepositoryError>;

    /// Remove every post written by `author_id`, returning how many were removed.
    async fn delete_by_author(&self, author_id: &AccountId) -> Result<usize, PostRepositoryError>;
}
