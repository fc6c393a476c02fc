//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the request and response DTOs,
//! the error envelope schemas, and the session cookie security scheme. The
//! document backs Swagger UI in debug builds and `openapi-dump`.

use crate::inbound::http::accounts::{
    AccountResponse, CurrentAccountResponse, LoginRequest, RegisterRequest,
};
use crate::inbound::http::posts::{PostRequest, PostResponse};
use crate::inbound::http::profiles::{DeletionResponse, ProfileRequest, ProfileResponse};
use crate::inbound::http::relationships::RelationshipSummaryResponse;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or POST /api/v1/users.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Social backend API",
        description = "Accounts, profiles, posts, and a symmetric follow graph."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::list_accounts,
        crate::inbound::http::accounts::current_account,
        crate::inbound::http::relationships::follow,
        crate::inbound::http::relationships::unfollow,
        crate::inbound::http::relationships::relationships,
        crate::inbound::http::profiles::save_profile,
        crate::inbound::http::profiles::my_profile,
        crate::inbound::http::profiles::list_profiles,
        crate::inbound::http::profiles::profile_by_user,
        crate::inbound::http::profiles::delete_account,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::posts_by_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        LoginRequest,
        AccountResponse,
        CurrentAccountResponse,
        RelationshipSummaryResponse,
        ProfileRequest,
        ProfileResponse,
        DeletionResponse,
        PostRequest,
        PostResponse
    )),
    tags(
        (name = "accounts", description = "Registration, login, and account lookup"),
        (name = "relationships", description = "Follow graph"),
        (name = "profiles", description = "Profiles and account deletion"),
        (name = "posts", description = "Posts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
