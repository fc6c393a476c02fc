//! Driven port for password hashing.
//!
//! Hashing is CPU bound, so the trait is synchronous; services call it from a
//! blocking task.

use crate::domain::CredentialHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hashers.
    pub enum CredentialHasherError {
        /// The password could not be hashed.
        Hashing { message: String } => "password hashing failed: {message}",
        /// The stored hash is not a valid encoded hash.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hashes and verifies account passwords.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password with a fresh salt.
    fn hash(&self, password: &str) -> Result<CredentialHash, CredentialHasherError>;

    /// Check `password` against a stored hash.
    fn verify(&self, password: &str, hash: &CredentialHash) -> Result<bool, CredentialHasherError>;
}
