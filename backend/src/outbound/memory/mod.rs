//! In-memory adapters for development and tests.
//!
//! Each store is a mutex-guarded map. Every port call takes the lock once, so
//! single-document operations are atomic exactly as the ports require.

mod accounts;
mod posts;
mod profiles;

pub use accounts::InMemoryAccountRepository;
pub use posts::InMemoryPostRepository;
pub use profiles::InMemoryProfileRepository;
