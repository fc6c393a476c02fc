//! PostgreSQL-backed [`AccountRepository`].
//!
//! Relationship sets live in `uuid[]` columns. Each set mutation is one
//! guarded `UPDATE` (`array_append` / `array_remove` filtered on membership),
//! which gives the single-document atomicity the relationship engine relies
//! on. A zero row count is disambiguated with an existence probe.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Uuid as SqlUuid;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{
    Account, AccountId, AccountStatus, CredentialHash, DisplayName, Email, RelationSide,
};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel implementation of [`AccountRepository`].
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> AccountRepositoryError {
    map_pool_error(error, AccountRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

fn side_column(side: RelationSide) -> &'static str {
    match side {
        RelationSide::Followers => "followers",
        RelationSide::Following => "following",
    }
}

fn add_relation_sql(side: RelationSide) -> String {
    let column = side_column(side);
    format!(
        "UPDATE accounts SET {column} = array_append({column}, $2) \
         WHERE id = $1 AND NOT ($2 = ANY({column}))"
    )
}

fn remove_relation_sql(side: RelationSide) -> String {
    let column = side_column(side);
    format!(
        "UPDATE accounts SET {column} = array_remove({column}, $2) \
         WHERE id = $1 AND $2 = ANY({column})"
    )
}

fn row_to_account(row: AccountRow) -> Result<Account, AccountRepositoryError> {
    let invalid = |what: &str| {
        AccountRepositoryError::query(format!("stored account {} has invalid {what}", row.id))
    };
    let email = Email::new(&row.email).map_err(|_| invalid("email"))?;
    let display_name = DisplayName::new(&row.display_name).map_err(|_| invalid("display name"))?;
    let status = AccountStatus::parse(&row.status).ok_or_else(|| invalid("status"))?;
    Ok(Account {
        id: AccountId::from_uuid(row.id),
        email,
        display_name,
        credential_hash: CredentialHash::new(row.credential_hash),
        followers: row.followers.into_iter().map(AccountId::from_uuid).collect(),
        following: row.following.into_iter().map(AccountId::from_uuid).collect(),
        status,
        created_at: row.created_at,
    })
}

impl DieselAccountRepository {
    async fn mutate_relation(
        &self,
        sql: String,
        owner: &AccountId,
        other: &AccountId,
    ) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let changed = diesel::sql_query(sql)
            .bind::<SqlUuid, _>(*owner.as_uuid())
            .bind::<SqlUuid, _>(*other.as_uuid())
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        if changed > 0 {
            return Ok(true);
        }
        let exists: Option<Uuid> = accounts::table
            .find(*owner.as_uuid())
            .select(accounts::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        match exists {
            Some(_) => Ok(false),
            None => Err(AccountRepositoryError::missing_account(*owner)),
        }
    }
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewAccountRow {
            id: *account.id.as_uuid(),
            email: account.email.as_ref(),
            display_name: account.display_name.as_ref(),
            credential_hash: account.credential_hash.expose(),
            followers: account.followers.iter().map(|id| *id.as_uuid()).collect(),
            following: account.following.iter().map(|id| *id.as_uuid()).collect(),
            status: account.status.as_str(),
            created_at: account.created_at,
        };
        diesel::insert_into(accounts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AccountRepositoryError::duplicate_email(account.email.as_ref())
                } else {
                    diesel_error(err)
                }
            })
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<AccountRow> = accounts::table
            .find(*id.as_uuid())
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<AccountRow> = accounts::table
            .filter(accounts::email.eq(email.as_ref()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn list(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<AccountRow> = accounts::table
            .order(accounts::created_at.asc())
            .select(AccountRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_account).collect()
    }

    async fn set_status(
        &self,
        id: &AccountId,
        status: AccountStatus,
    ) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(accounts::table.find(*id.as_uuid()))
            .set(accounts::status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        if updated == 0 {
            return Err(AccountRepositoryError::missing_account(*id));
        }
        Ok(())
    }

    async fn add_relation(
        &self,
        owner: &AccountId,
        side: RelationSide,
        other: &AccountId,
    ) -> Result<bool, AccountRepositoryError> {
        self.mutate_relation(add_relation_sql(side), owner, other)
            .await
    }

    async fn remove_relation(
        &self,
        owner: &AccountId,
        side: RelationSide,
        other: &AccountId,
    ) -> Result<bool, AccountRepositoryError> {
        self.mutate_relation(remove_relation_sql(side), owner, other)
            .await
    }

    async fn find_referencing(
        &self,
        id: &AccountId,
    ) -> Result<Vec<AccountId>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let needle = vec![*id.as_uuid()];
        let ids: Vec<Uuid> = accounts::table
            .filter(
                accounts::followers
                    .contains(needle.clone())
                    .or(accounts::following.contains(needle)),
            )
            .select(accounts::id)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(ids.into_iter().map(AccountId::from_uuid).collect())
    }

    async fn delete(&self, id: &AccountId) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(accounts::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}
