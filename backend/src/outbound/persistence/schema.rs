//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly. `diesel print-schema`
//! against a migrated database regenerates them.

diesel::table! {
    /// Account documents. `followers` and `following` hold the two halves of
    /// the follow graph as UUID arrays.
    accounts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Normalised, unique email address.
        email -> Varchar,
        /// Name shown to other users.
        display_name -> Varchar,
        /// Argon2 PHC string.
        credential_hash -> Text,
        /// Accounts following this one.
        followers -> Array<Uuid>,
        /// Accounts this one follows.
        following -> Array<Uuid>,
        /// `active` or `deleting`.
        status -> Varchar,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One profile per account.
    profiles (account_id) {
        account_id -> Uuid,
        bio -> Text,
        status -> Varchar,
        location -> Nullable<Varchar>,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Posts, newest first per author via `posts_author_created_idx`.
    posts (id) {
        id -> Uuid,
        author_id -> Uuid,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(profiles -> accounts (account_id));
diesel::joinable!(posts -> accounts (author_id));

diesel::allow_tables_to_appear_in_same_query!(accounts, profiles, posts);
