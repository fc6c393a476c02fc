//! Post publishing and listing.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::account_service::map_account_repository_error;
use super::ports::{AccountRepository, PostCommand, PostQuery, PostRepository, PostRepositoryError};
use super::{AccountId, Error, Post};

/// Implements the post driving ports.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl PostService {
    /// Create a new service.
    pub fn new(posts: Arc<dyn PostRepository>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { posts, accounts }
    }

    async fn is_active(&self, id: &AccountId) -> Result<bool, Error> {
        Ok(self
            .accounts
            .find_by_id(id)
            .await
            .map_err(map_account_repository_error)?
            .is_some_and(|account| account.is_active()))
    }

    async fn ensure_active(&self, id: &AccountId) -> Result<(), Error> {
        if self.is_active(id).await? {
            Ok(())
        } else {
            Err(missing_author(id))
        }
    }
}

fn missing_author(id: &AccountId) -> Error {
    Error::not_found(format!("account {id} not found"))
}

fn map_post_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => {
            tracing::warn!(%message, "post store connection failed");
            Error::service_unavailable("post store unavailable")
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post store error: {message}"))
        }
    }
}

#[async_trait]
impl PostCommand for PostService {
    async fn create_post(&self, author: AccountId, text: String) -> Result<Post, Error> {
        let post = Post::compose(author, &text).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "text" }))
        })?;
        self.ensure_active(&author).await?;
        self.posts.insert(&post).await.map_err(map_post_error)?;
        // A deletion that began during the insert may already have cleared
        // this author's posts.
        if !self.is_active(&author).await? {
            let removed = self
                .posts
                .delete_by_author(&author)
                .await
                .map_err(map_post_error)?;
            tracing::info!(%author, removed, "discarded post written during account deletion");
            return Err(missing_author(&author));
        }
        Ok(post)
    }
}

#[async_trait]
impl PostQuery for PostService {
    async fn posts_by(&self, author: &AccountId) -> Result<Vec<Post>, Error> {
        self.ensure_active(author).await?;
        self.posts
            .list_by_author(author)
            .await
            .map_err(map_post_error)
    }
}
