//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::json;

use crate::domain::ports::{CredentialHasher, CredentialHasherError};
use crate::domain::{CredentialHash, Repositories, SocialServices};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{
    InMemoryAccountRepository, InMemoryPostRepository, InMemoryProfileRepository,
};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Reversible stand-in for Argon2 so handler tests stay fast.
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<CredentialHash, CredentialHasherError> {
        Ok(CredentialHash::new(format!("plain:{password}")))
    }

    fn verify(&self, password: &str, hash: &CredentialHash) -> Result<bool, CredentialHasherError> {
        Ok(hash.expose() == format!("plain:{password}"))
    }
}

/// Services over empty in-memory stores.
pub fn in_memory_services() -> SocialServices {
    SocialServices::new(Repositories {
        accounts: Arc::new(InMemoryAccountRepository::new()),
        profiles: Arc::new(InMemoryProfileRepository::new()),
        posts: Arc::new(InMemoryPostRepository::new()),
        hasher: Arc::new(PlainHasher),
    })
}

/// HTTP state over empty in-memory stores.
pub fn in_memory_state() -> HttpState {
    HttpState::new(&in_memory_services())
}

/// Extract the session cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// App serving `/api/v1` over `state` with a test session middleware.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(super::configure_api))
}

/// Registration request for `name` with email `name@example.com`.
pub fn register_request(name: &str) -> test::TestRequest {
    test::TestRequest::post().uri("/api/v1/users").set_json(json!({
        "displayName": name,
        "email": format!("{name}@example.com"),
        "password": "secret1",
    }))
}
