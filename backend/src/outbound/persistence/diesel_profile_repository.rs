//! PostgreSQL-backed [`ProfileRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{AccountId, Profile};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::ProfileRow;
use super::pool::{DbPool, PoolError};
use super::schema::profiles;

/// Diesel implementation of [`ProfileRepository`].
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ProfileRepositoryError {
    map_pool_error(error, ProfileRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ProfileRepositoryError {
    map_diesel_error(
        error,
        ProfileRepositoryError::query,
        ProfileRepositoryError::connection,
    )
}

impl From<&Profile> for ProfileRow {
    fn from(profile: &Profile) -> Self {
        Self {
            account_id: *profile.account_id.as_uuid(),
            bio: profile.bio.clone(),
            status: profile.status.clone(),
            location: profile.location.clone(),
            updated_at: profile.updated_at,
        }
    }
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            account_id: AccountId::from_uuid(row.account_id),
            bio: row.bio,
            status: row.status,
            location: row.location,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn upsert(&self, profile: &Profile) -> Result<(), ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = ProfileRow::from(profile);
        diesel::insert_into(profiles::table)
            .values(&row)
            .on_conflict(profiles::account_id)
            .do_update()
            .set((
                profiles::bio.eq(excluded(profiles::bio)),
                profiles::status.eq(excluded(profiles::status)),
                profiles::location.eq(excluded(profiles::location)),
                profiles::updated_at.eq(excluded(profiles::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ProfileRow> = profiles::table
            .find(*account_id.as_uuid())
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(Profile::from))
    }

    async fn list(&self) -> Result<Vec<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<ProfileRow> = profiles::table
            .order(profiles::updated_at.desc())
            .select(ProfileRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn delete_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<bool, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(profiles::table.find(*account_id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProfileDraft;
    use rstest::rstest;

    #[rstest]
    fn profile_survives_row_conversion() {
        let profile = Profile::from_draft(
            AccountId::random(),
            ProfileDraft {
                bio: "Bio".to_owned(),
                status: "Engineer".to_owned(),
                location: Some("Paris".to_owned()),
            },
        )
        .expect("valid profile");

        let restored = Profile::from(ProfileRow::from(&profile));

        assert_eq!(restored, profile);
    }
}
