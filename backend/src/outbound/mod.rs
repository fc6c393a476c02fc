//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: mutex-guarded in-memory repositories for development and
//!   tests.
//! - **security**: Argon2 credential hashing.
//!
//! Adapters translate between domain types and infrastructure
//! representations; they contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;
