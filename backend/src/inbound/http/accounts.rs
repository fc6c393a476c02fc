//! Account API handlers.
//!
//! ```text
//! POST /api/v1/users {"displayName":"Ada","email":"ada@example.com","password":"secret1"}
//! POST /api/v1/login {"email":"ada@example.com","password":"secret1"}
//! GET /api/v1/users
//! GET /api/v1/users/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    Account, AccountValidationError, CredentialValidationError, Error, LoginCredentials,
    Registration,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

/// Login body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account as other users see it.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub display_name: String,
    pub follower_count: usize,
    pub following_count: usize,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: *account.id.as_uuid(),
            display_name: account.display_name.to_string(),
            follower_count: account.followers.len(),
            following_count: account.following.len(),
        }
    }
}

/// The signed-in account, including private fields.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAccountResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub followers: Vec<Uuid>,
    pub following: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for CurrentAccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: *account.id.as_uuid(),
            email: account.email.to_string(),
            display_name: account.display_name.to_string(),
            followers: account.followers.iter().map(|id| *id.as_uuid()).collect(),
            following: account.following.iter().map(|id| *id.as_uuid()).collect(),
            created_at: account.created_at,
        }
    }
}

fn map_credential_error(err: CredentialValidationError) -> Error {
    let (field, code) = match &err {
        CredentialValidationError::Account(inner) => match inner {
            AccountValidationError::EmptyEmail => ("email", "empty_email"),
            AccountValidationError::InvalidEmail => ("email", "invalid_email"),
            AccountValidationError::EmptyDisplayName => ("displayName", "empty_display_name"),
            AccountValidationError::DisplayNameTooLong { .. } => {
                ("displayName", "display_name_too_long")
            }
            AccountValidationError::EmptyId | AccountValidationError::InvalidId => {
                ("id", "invalid_account_id")
            }
        },
        CredentialValidationError::EmptyPassword => ("password", "empty_password"),
        CredentialValidationError::PasswordTooShort { .. } => ("password", "password_too_short"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Register an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = CurrentAccountResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        display_name,
        email,
        password,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(&display_name, &email, &password)
        .map_err(map_credential_error)?;
    let account = state.registration.register(registration).await?;
    session.persist_account(&account.id)?;
    Ok(HttpResponse::Created().json(CurrentAccountResponse::from(&account)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_credential_error)?;
    let account_id = state.login.authenticate(&credentials).await?;
    session.persist_account(&account_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// List active accounts.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Accounts", body = [AccountResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "listAccounts"
)]
#[get("/users")]
pub async fn list_accounts(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<AccountResponse>>> {
    session.require_account_id()?;
    let accounts = state.accounts.list_accounts().await?;
    Ok(web::Json(accounts.iter().map(AccountResponse::from).collect()))
}

/// Return the signed-in account.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current account", body = CurrentAccountResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "currentAccount"
)]
#[get("/users/me")]
pub async fn current_account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CurrentAccountResponse>> {
    let id = session.require_account_id()?;
    let account = state.accounts.find_account(&id).await?;
    Ok(web::Json(CurrentAccountResponse::from(&account)))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
