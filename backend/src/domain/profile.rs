//! Profile data model: the one-to-one extension of an account.

use chrono::{DateTime, Utc};

use super::AccountId;

/// Maximum accepted length for free-text profile fields.
pub const PROFILE_FIELD_MAX: usize = 500;

/// Validation errors for profile fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileValidationError {
    /// A required field was blank.
    #[error("{field} is required")]
    Missing {
        /// Field name as exposed to clients.
        field: &'static str,
    },
    /// A field exceeded [`PROFILE_FIELD_MAX`].
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field name as exposed to clients.
        field: &'static str,
        /// Maximum accepted length.
        max: usize,
    },
}

/// Profile owned by exactly one account and deleted with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Owning account.
    pub account_id: AccountId,
    /// Free-text biography.
    pub bio: String,
    /// Short status line (e.g. "Developer").
    pub status: String,
    /// Optional location.
    pub location: Option<String>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Unvalidated profile fields supplied by a client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileDraft {
    /// Free-text biography.
    pub bio: String,
    /// Short status line.
    pub status: String,
    /// Optional location; blank values are dropped.
    pub location: Option<String>,
}

impl Profile {
    /// Validate a draft into a profile for `account_id`.
    ///
    /// # Examples
    /// ```
    /// use social_backend::domain::{AccountId, Profile, ProfileDraft};
    ///
    /// let draft = ProfileDraft {
    ///     bio: "Analyst".into(),
    ///     status: "Engineer".into(),
    ///     location: Some("  ".into()),
    /// };
    /// let profile = Profile::from_draft(AccountId::random(), draft).expect("valid profile");
    /// assert!(profile.location.is_none());
    /// ```
    pub fn from_draft(
        account_id: AccountId,
        draft: ProfileDraft,
    ) -> Result<Self, ProfileValidationError> {
        let bio = required("bio", &draft.bio)?;
        let status = required("status", &draft.status)?;
        let location = match draft.location.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => Some(bounded("location", value)?),
            _ => None,
        };
        Ok(Self {
            account_id,
            bio,
            status,
            location,
            updated_at: Utc::now(),
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ProfileValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProfileValidationError::Missing { field });
    }
    bounded(field, trimmed)
}

fn bounded(field: &'static str, value: &str) -> Result<String, ProfileValidationError> {
    if value.chars().count() > PROFILE_FIELD_MAX {
        return Err(ProfileValidationError::TooLong {
            field,
            max: PROFILE_FIELD_MAX,
        });
    }
    Ok(value.to_owned())
}
