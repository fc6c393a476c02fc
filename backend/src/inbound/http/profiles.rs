//! Profile handlers and self-service account deletion.
//!
//! ```text
//! POST   /api/v1/profile {"bio":"...","status":"Developer","location":"Leeds"}
//! GET    /api/v1/profile/me
//! GET    /api/v1/profile
//! GET    /api/v1/profile/user/{id}
//! DELETE /api/v1/profile
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::ProfileView;
use crate::domain::{DeletionReport, Error, ProfileDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::parse_account_id;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Profile fields supplied by the owner.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub bio: String,
    pub status: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl From<ProfileRequest> for ProfileDraft {
    fn from(value: ProfileRequest) -> Self {
        Self {
            bio: value.bio,
            status: value.status,
            location: value.location,
        }
    }
}

/// Profile joined with the owner's display name.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub account_id: Uuid,
    pub display_name: String,
    pub bio: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub location: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileView> for ProfileResponse {
    fn from(view: ProfileView) -> Self {
        let ProfileView {
            profile,
            display_name,
        } = view;
        Self {
            account_id: *profile.account_id.as_uuid(),
            display_name: display_name.to_string(),
            bio: profile.bio,
            status: profile.status,
            location: profile.location,
            updated_at: profile.updated_at,
        }
    }
}

/// What a cascade deletion removed.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletionResponse {
    pub posts_removed: usize,
    pub profile_removed: bool,
    pub references_removed: usize,
}

impl From<DeletionReport> for DeletionResponse {
    fn from(report: DeletionReport) -> Self {
        Self {
            posts_removed: report.posts_removed,
            profile_removed: report.profile_removed,
            references_removed: report.references_removed,
        }
    }
}

/// Create or replace the signed-in account's profile.
#[utoipa::path(
    post,
    path = "/api/v1/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Saved profile", body = ProfileResponse),
        (status = 400, description = "Invalid profile", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "saveProfile"
)]
#[post("/profile")]
pub async fn save_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let id = session.require_account_id()?;
    state
        .profiles
        .save_profile(id, payload.into_inner().into())
        .await?;
    let view = state.profiles_query.profile_for(&id).await?;
    Ok(web::Json(view.into()))
}

/// The signed-in account's profile.
#[utoipa::path(
    get,
    path = "/api/v1/profile/me",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No profile yet", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "myProfile"
)]
#[get("/profile/me")]
pub async fn my_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProfileResponse>> {
    let id = session.require_account_id()?;
    let view = state.profiles_query.profile_for(&id).await?;
    Ok(web::Json(view.into()))
}

/// All profiles with their owners' display names.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Profiles", body = [ProfileResponse]),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "listProfiles",
    security([])
)]
#[get("/profile")]
pub async fn list_profiles(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ProfileResponse>>> {
    let views = state.profiles_query.list_profiles().await?;
    Ok(web::Json(views.into_iter().map(ProfileResponse::from).collect()))
}

/// Profile of the account `{id}`.
#[utoipa::path(
    get,
    path = "/api/v1/profile/user/{id}",
    params(("id" = Uuid, Path, description = "Owning account")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "No profile for this user", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "profileByUser",
    security([])
)]
#[get("/profile/user/{id}")]
pub async fn profile_by_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let id = parse_account_id(&path)?;
    let view = state.profiles_query.profile_for(&id).await?;
    Ok(web::Json(view.into()))
}

/// Delete the signed-in account with its profile, posts, and every
/// relationship, then end the session.
#[utoipa::path(
    delete,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Account deleted", body = DeletionResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account not found", body = Error),
        (status = 503, description = "Deletion interrupted; it resumes on retry", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "deleteAccount"
)]
#[delete("/profile")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let id = session.require_account_id()?;
    let report = state.deletion.delete_account(id).await?;
    session.clear();
    info!(account = %id, "account deleted by owner");
    Ok(HttpResponse::Ok().json(DeletionResponse::from(report)))
}

#[cfg(test)]
#[path = "profiles_tests.rs"]
mod tests;
