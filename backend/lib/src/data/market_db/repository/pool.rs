//! bb8 connection pool for the market database.

use std::time::Duration;

use diesel_async::{
    pooled_connection::{AsyncDieselConnectionManager, ManagerConfig},
    AsyncPgConnection,
};
use tracing::debug;

use market_db::{DbConnection, DbPool};

use super::error::RepositoryError;

const LOG_TARGET: &str = "market-backend::pool";

/// Sizing and lifetime of the pooled connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_size: u32,
    pub min_idle: Option<u32>,
    pub connection_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
    /// Negotiate TLS through `market_db::establish_connection`
    pub tls: bool,
}

/// Connection pool handed out by the repository.
///
/// Connections are opened lazily; the first [`ConnectionPool::get`] surfaces
/// an unreachable database or a TLS failure.
pub struct ConnectionPool {
    inner: DbPool,
}

impl ConnectionPool {
    pub async fn new(database_url: &str, settings: PoolSettings) -> Result<Self, RepositoryError> {
        let manager = if settings.tls {
            let mut manager_cfg = ManagerConfig::default();
            manager_cfg.custom_setup = Box::new(market_db::establish_connection);
            AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(
                database_url,
                manager_cfg,
            )
        } else {
            AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url)
        };

        let inner = DbPool::builder()
            .max_size(settings.max_size)
            .min_idle(settings.min_idle)
            .connection_timeout(settings.connection_timeout)
            .idle_timeout(settings.idle_timeout)
            .max_lifetime(settings.max_lifetime)
            .build(manager)
            .await
            .map_err(|e| RepositoryError::Pool(format!("cannot build pool: {e}")))?;

        debug!(
            target: LOG_TARGET,
            max_size = settings.max_size,
            tls = settings.tls,
            "Connection pool ready"
        );

        Ok(Self { inner })
    }

    pub async fn get(&self) -> Result<DbConnection<'_>, RepositoryError> {
        self.inner
            .get()
            .await
            .map_err(|e| RepositoryError::Pool(format!("no connection available: {e}")))
    }

    /// Connections currently open, idle ones included.
    pub fn open_connections(&self) -> u32 {
        self.inner.state().connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::market_db::test_helpers::setup_test_db;

    fn plain(max_size: u32) -> PoolSettings {
        PoolSettings {
            max_size,
            min_idle: None,
            connection_timeout: Duration::from_secs(5),
            idle_timeout: None,
            max_lifetime: None,
            tls: false,
        }
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn hands_out_connections_up_to_max_size() {
        let (_container, url) = setup_test_db(vec![]).await;
        let pool = ConnectionPool::new(&url, plain(2)).await.expect("pool built");

        let first = pool.get().await.expect("first connection");
        let second = pool.get().await.expect("second connection");
        assert_eq!(pool.open_connections(), 2);
        drop((first, second));
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn times_out_when_exhausted() {
        let (_container, url) = setup_test_db(vec![]).await;
        let settings = PoolSettings {
            connection_timeout: Duration::from_millis(200),
            ..plain(1)
        };
        let pool = ConnectionPool::new(&url, settings).await.expect("pool built");

        let _held = pool.get().await.expect("first connection");
        assert!(matches!(pool.get().await, Err(RepositoryError::Pool(_))));
    }
}
