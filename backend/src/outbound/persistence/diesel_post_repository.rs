//! PostgreSQL-backed [`PostRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{AccountId, Post};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::PostRow;
use super::pool::{DbPool, PoolError};
use super::schema::posts;

/// Diesel implementation of [`PostRepository`].
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> PostRepositoryError {
    map_pool_error(error, PostRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> PostRepositoryError {
    map_diesel_error(
        error,
        PostRepositoryError::query,
        PostRepositoryError::connection,
    )
}

fn row_to_post(row: PostRow) -> Post {
    Post {
        id: row.id,
        author_id: AccountId::from_uuid(row.author_id),
        text: row.body,
        created_at: row.created_at,
    }
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = PostRow {
            id: post.id,
            author_id: *post.author_id.as_uuid(),
            body: post.text.clone(),
            created_at: post.created_at,
        };
        diesel::insert_into(posts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn list_by_author(
        &self,
        author_id: &AccountId,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<PostRow> = posts::table
            .filter(posts::author_id.eq(author_id.as_uuid()))
            .order(posts::created_at.desc())
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(row_to_post).collect())
    }

    async fn delete_by_author(&self, author_id: &AccountId) -> Result<usize, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::delete(posts::table.filter(posts::author_id.eq(author_id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)
    }
}
