//! Post handlers.
//!
//! ```text
//! POST /api/v1/posts {"text":"hello"}
//! GET  /api/v1/users/{id}/posts
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, Post};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::parse_account_id;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/v1/posts`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub text: String,
}

/// A stored post.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author_id: *post.author_id.as_uuid(),
            text: post.text,
            created_at: post.created_at,
        }
    }
}

/// Publish a post as the signed-in account.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Invalid post", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PostRequest>,
) -> ApiResult<HttpResponse> {
    let author = session.require_account_id()?;
    let post = state
        .posts
        .create_post(author, payload.into_inner().text)
        .await?;
    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// Posts written by `{id}`, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/posts",
    params(("id" = Uuid, Path, description = "Author")),
    responses(
        (status = 200, description = "Posts", body = [PostResponse]),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Account not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "postsByUser",
    security([])
)]
#[get("/users/{id}/posts")]
pub async fn posts_by_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PostResponse>>> {
    let author = parse_account_id(&path)?;
    let posts = state.posts_query.posts_by(&author).await?;
    Ok(web::Json(posts.into_iter().map(PostResponse::from).collect()))
}
