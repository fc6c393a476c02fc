//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod error;
pub mod health;
pub mod posts;
pub mod profiles;
pub mod relationships;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` handler on `cfg`.
///
/// Session middleware and [`state::HttpState`] are supplied by the caller.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::register)
        .service(accounts::login)
        .service(accounts::list_accounts)
        .service(accounts::current_account)
        .service(relationships::follow)
        .service(relationships::unfollow)
        .service(relationships::relationships)
        .service(profiles::save_profile)
        .service(profiles::my_profile)
        .service(profiles::list_profiles)
        .service(profiles::profile_by_user)
        .service(profiles::delete_account)
        .service(posts::create_post)
        .service(posts::posts_by_user);
}
