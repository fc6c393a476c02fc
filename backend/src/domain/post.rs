//! Post data model.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::AccountId;

/// Maximum post length in characters.
pub const POST_TEXT_MAX: usize = 2000;

/// Validation errors for post content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    /// The text was blank.
    #[error("text is required")]
    EmptyText,
    /// The text exceeded [`POST_TEXT_MAX`].
    #[error("text must be at most {max} characters")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

/// A post owned by its author and removed when the author is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Post identifier.
    pub id: Uuid,
    /// Owning account.
    pub author_id: AccountId,
    /// Body text.
    pub text: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Validate `text` and build a new post for `author_id`.
    pub fn compose(author_id: AccountId, text: &str) -> Result<Self, PostValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(PostValidationError::EmptyText);
        }
        if trimmed.chars().count() > POST_TEXT_MAX {
            return Err(PostValidationError::TooLong { max: POST_TEXT_MAX });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            text: trimmed.to_owned(),
            created_at: Utc::now(),
        })
    }
}
