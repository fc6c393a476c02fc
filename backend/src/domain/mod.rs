//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed entities (accounts, profiles, posts), the
//! relationship graph engine that keeps follow edges symmetric, and the
//! services behind every driving port. Nothing here knows about HTTP or SQL;
//! adapters live in `inbound` and `outbound`.
//!
//! Public surface:
//! - [`Account`], [`Profile`], [`Post`] and their validated value types.
//! - [`RelationshipGraph`]: follow/unfollow with per-pair serialisation.
//! - [`AccountDeletionService`]: cascade deletion.
//! - [`RelationshipReconciler`]: background repair sweep.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failures.

pub mod account;
pub mod account_deletion;
pub mod account_service;
pub mod auth;
pub mod error;
pub mod pair_locks;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod profile;
pub mod profile_service;
pub mod reconciliation;
pub mod relationship;
pub mod relationship_graph;
pub mod social_services;
pub mod trace_id;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::account::{
    Account, AccountId, AccountStatus, AccountValidationError, CredentialHash, DISPLAY_NAME_MAX,
    DisplayName, Email, RelationSide,
};
pub use self::account_deletion::AccountDeletionService;
pub use self::account_service::AccountService;
pub use self::auth::{
    CredentialValidationError, LoginCredentials, PASSWORD_MIN_LEN, Registration,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::pair_locks::{PairGuard, PairKey, PairLocks};
pub use self::post::{POST_TEXT_MAX, Post, PostValidationError};
pub use self::post_service::PostService;
pub use self::profile::{PROFILE_FIELD_MAX, Profile, ProfileDraft, ProfileValidationError};
pub use self::profile_service::ProfileService;
pub use self::reconciliation::{RelationshipReconciler, SweepReport, spawn_reconciliation};
pub use self::relationship::{DeletionReport, RelationshipError, RelationshipSummary};
pub use self::relationship_graph::RelationshipGraph;
pub use self::social_services::{Repositories, SocialServices};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use social_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
