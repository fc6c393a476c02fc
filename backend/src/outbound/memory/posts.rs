//! In-memory [`PostRepository`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{AccountId, Post};

/// Posts in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    posts: Mutex<Vec<Post>>,
}

impl InMemoryPostRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn posts(&self) -> MutexGuard<'_, Vec<Post>> {
        self.posts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        self.posts().push(post.clone());
        Ok(())
    }

    async fn list_by_author(
        &self,
        author_id: &AccountId,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let mut authored: Vec<Post> = self
            .posts()
            .iter()
            .filter(|post| post.author_id == *author_id)
            .cloned()
            .collect();
        authored.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(authored)
    }

    async fn delete_by_author(&self, author_id: &AccountId) -> Result<usize, PostRepositoryError> {
        let mut posts = self.posts();
        let before = posts.len();
        posts.retain(|post| post.author_id != *author_id);
        Ok(before - posts.len())
    }
}
