//! Builders for the repositories behind the domain services.

use std::sync::Arc;

use tracing::{info, warn};

use social_backend::domain::Repositories;
use social_backend::outbound::memory::{
    InMemoryAccountRepository, InMemoryPostRepository, InMemoryProfileRepository,
};
use social_backend::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselPostRepository, DieselProfileRepository, PoolConfig,
    run_pending_migrations,
};
use social_backend::outbound::security::Argon2Hasher;

use super::ServerConfig;

/// Build PostgreSQL repositories when a database URL is configured, running
/// pending migrations first; otherwise fall back to in-memory stores.
///
/// # Errors
/// Returns [`std::io::Error`] if migrations fail or the pool cannot be built.
pub(crate) async fn build_repositories(config: &ServerConfig) -> std::io::Result<Repositories> {
    let hasher = Arc::new(Argon2Hasher::new());
    match config.database_url.as_deref() {
        Some(url) => {
            let applied = run_pending_migrations(url)
                .await
                .map_err(std::io::Error::other)?;
            info!(applied, "database migrations complete");
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(std::io::Error::other)?;
            Ok(Repositories {
                accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
                profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
                posts: Arc::new(DieselPostRepository::new(pool)),
                hasher,
            })
        }
        None => {
            warn!("no database configured; using the in-memory store (data is not persisted)");
            Ok(Repositories {
                accounts: Arc::new(InMemoryAccountRepository::new()),
                profiles: Arc::new(InMemoryProfileRepository::new()),
                posts: Arc::new(InMemoryPostRepository::new()),
                hasher,
            })
        }
    }
}
