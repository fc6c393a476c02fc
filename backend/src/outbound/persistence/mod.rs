//! PostgreSQL persistence adapters.
//!
//! Diesel repositories implementing the account, profile, and post ports
//! over a shared `diesel-async` pool. Row structs and table definitions stay
//! private to this module.

mod diesel_account_repository;
mod diesel_error_mapping;
mod diesel_post_repository;
mod diesel_profile_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
