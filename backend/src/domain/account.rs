//! Account data model.
//!
//! An [`Account`] is the document persisted by the account store. Besides the
//! identity fields it embeds both halves of the follow graph: `followers`
//! (accounts following this one) and `following` (accounts this one follows).
//! The two sets are only ever mutated through the relationship graph engine,
//! the deletion coordinator, and the reconciliation sweep.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the account value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// Identifier was blank.
    #[error("account id must not be empty")]
    EmptyId,
    /// Identifier was not a UUID.
    #[error("account id must be a valid UUID")]
    InvalidId,
    /// Email was blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email did not look like an address.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Display name was blank.
    #[error("display name must not be empty")]
    EmptyDisplayName,
    /// Display name exceeded the maximum length.
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

/// Stable account identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(Uuid);

impl AccountId {
    /// Validate and construct an [`AccountId`] from borrowed input.
    ///
    /// # Examples
    /// ```
    /// use social_backend::domain::AccountId;
    ///
    /// let id = AccountId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    /// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(AccountValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(AccountValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| AccountValidationError::InvalidId)
    }

    /// Generate a new random [`AccountId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-validated UUID, e.g. one read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Deliberately loose: one `@`, no whitespace, a dot in the domain.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised (trimmed, lower-cased) email address; the registration key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use social_backend::domain::Email;
    ///
    /// let email = Email::new("  Ada@Example.COM ").expect("valid email");
    /// assert_eq!(email.as_ref(), "ada@example.com");
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&normalised) {
            return Err(AccountValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 64;

/// Human readable name shown to other users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`]; surrounding whitespace is trimmed.
    pub fn new(display_name: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = display_name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(AccountValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque credential hash (PHC string). Never serialised.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wrap a hash produced by a [`crate::domain::ports::CredentialHasher`].
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Access the encoded hash for verification or persistence.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(..)")
    }
}

/// Lifecycle state of an account document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Normal state; visible to every operation.
    Active,
    /// Cascade deletion has started but not finished. The relationship
    /// engine treats the account as missing.
    Deleting,
}

impl AccountStatus {
    /// Storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deleting => "deleting",
        }
    }

    /// Parse the storage representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "deleting" => Some(Self::Deleting),
            _ => None,
        }
    }
}

/// Which embedded relationship set an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationSide {
    /// Accounts following the owner.
    Followers,
    /// Accounts the owner follows.
    Following,
}

impl RelationSide {
    /// Name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Followers => "followers",
            Self::Following => "following",
        }
    }
}

/// Persisted account document.
///
/// ## Invariants
/// - `id` never appears in `followers` or `following`.
/// - For any two accounts `a`, `b`:
///   `b.id ∈ a.following ⟺ a.id ∈ b.followers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Stable identifier.
    pub id: AccountId,
    /// Unique, normalised email address.
    pub email: Email,
    /// Name shown to other users.
    pub display_name: DisplayName,
    /// Hashed password.
    pub credential_hash: CredentialHash,
    /// Accounts following this one.
    pub followers: BTreeSet<AccountId>,
    /// Accounts this one follows.
    pub following: BTreeSet<AccountId>,
    /// Lifecycle state.
    pub status: AccountStatus,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a freshly registered account with empty relationship sets.
    pub fn register(
        email: Email,
        display_name: DisplayName,
        credential_hash: CredentialHash,
    ) -> Self {
        Self {
            id: AccountId::random(),
            email,
            display_name,
            credential_hash,
            followers: BTreeSet::new(),
            following: BTreeSet::new(),
            status: AccountStatus::Active,
            created_at: Utc::now(),
        }
    }

    /// Borrow one of the embedded relationship sets.
    pub fn relation(&self, side: RelationSide) -> &BTreeSet<AccountId> {
        match side {
            RelationSide::Followers => &self.followers,
            RelationSide::Following => &self.following,
        }
    }

    /// Mutably borrow one of the embedded relationship sets.
    pub fn relation_mut(&mut self, side: RelationSide) -> &mut BTreeSet<AccountId> {
        match side {
            RelationSide::Followers => &mut self.followers,
            RelationSide::Following => &mut self.following,
        }
    }

    /// Whether `other` is recorded in this account's `followers`.
    pub fn is_followed_by(&self, other: &AccountId) -> bool {
        self.followers.contains(other)
    }

    /// Whether this account records `other` in its `following`.
    pub fn follows(&self, other: &AccountId) -> bool {
        self.following.contains(other)
    }

    /// Whether the account is visible to relationship operations.
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

#[cfg(test)]
mod tests;
