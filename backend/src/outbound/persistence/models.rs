//! Internal Diesel row structs.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{accounts, posts, profiles};

/// Row read from `accounts`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub credential_hash: String,
    pub followers: Vec<Uuid>,
    pub following: Vec<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable account row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub display_name: &'a str,
    pub credential_hash: &'a str,
    pub followers: Vec<Uuid>,
    pub following: Vec<Uuid>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row read from or written to `profiles`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub account_id: Uuid,
    pub bio: String,
    pub status: String,
    pub location: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Row read from or written to `posts`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
