//! Follow graph handlers.
//!
//! ```text
//! PUT /api/v1/users/follow/{id}
//! PUT /api/v1/users/unfollow/{id}
//! GET /api/v1/users/{id}/relationships
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, RelationshipSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::parse_account_id;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Followers and followees of one account.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipSummaryResponse {
    pub account_id: Uuid,
    pub followers: Vec<Uuid>,
    pub following: Vec<Uuid>,
    pub follower_count: usize,
    pub following_count: usize,
}

impl From<RelationshipSummary> for RelationshipSummaryResponse {
    fn from(summary: RelationshipSummary) -> Self {
        Self {
            follower_count: summary.follower_count(),
            following_count: summary.following_count(),
            account_id: *summary.account_id.as_uuid(),
            followers: summary.followers.iter().map(|id| *id.as_uuid()).collect(),
            following: summary.following.iter().map(|id| *id.as_uuid()).collect(),
        }
    }
}

/// Follow `{id}` as the signed-in account.
#[utoipa::path(
    put,
    path = "/api/v1/users/follow/{id}",
    params(("id" = Uuid, Path, description = "Account to follow")),
    responses(
        (status = 200, description = "Target relationships after the change", body = RelationshipSummaryResponse),
        (status = 400, description = "Self-follow or malformed id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account not found", body = Error),
        (status = 409, description = "Already following", body = Error),
        (status = 500, description = "Inconsistent pair repaired; retry", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["relationships"],
    operation_id = "follow"
)]
#[put("/users/follow/{id}")]
pub async fn follow(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RelationshipSummaryResponse>> {
    let actor = session.require_account_id()?;
    let target = parse_account_id(&path)?;
    let summary = state.relationships.follow(actor, target).await?;
    Ok(web::Json(summary.into()))
}

/// Stop following `{id}`.
#[utoipa::path(
    put,
    path = "/api/v1/users/unfollow/{id}",
    params(("id" = Uuid, Path, description = "Account to unfollow")),
    responses(
        (status = 200, description = "Target relationships after the change", body = RelationshipSummaryResponse),
        (status = 400, description = "Self-unfollow or malformed id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account not found", body = Error),
        (status = 409, description = "Not following", body = Error),
        (status = 500, description = "Inconsistent pair repaired; retry", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["relationships"],
    operation_id = "unfollow"
)]
#[put("/users/unfollow/{id}")]
pub async fn unfollow(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RelationshipSummaryResponse>> {
    let actor = session.require_account_id()?;
    let target = parse_account_id(&path)?;
    let summary = state.relationships.unfollow(actor, target).await?;
    Ok(web::Json(summary.into()))
}

/// Read the relationships of `{id}`.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/relationships",
    params(("id" = Uuid, Path, description = "Account to inspect")),
    responses(
        (status = 200, description = "Relationships", body = RelationshipSummaryResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account not found", body = Error)
    ),
    tags = ["relationships"],
    operation_id = "relationships"
)]
#[get("/users/{id}/relationships")]
pub async fn relationships(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RelationshipSummaryResponse>> {
    session.require_account_id()?;
    let id = parse_account_id(&path)?;
    let summary = state.relationships_query.relationships(&id).await?;
    Ok(web::Json(summary.into()))
}

#[cfg(test)]
#[path = "relationships_tests.rs"]
mod tests;
