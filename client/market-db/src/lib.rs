use std::{fs::File, io::BufReader};

use diesel::prelude::*;
use diesel::{ConnectionError, ConnectionResult};
use diesel_async::{
    pooled_connection::bb8::{Pool, PooledConnection},
    AsyncPgConnection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use futures::{future::BoxFuture, FutureExt};
use rustls::{version, ClientConfig, RootCertStore};
use rustls_pemfile::certs as load_pem_certs;
use rustls_platform_verifier::ConfigVerifierExt;
use thiserror::Error;
use tracing::{info, warn};

pub mod models;
pub mod schema;

pub use models::{Article, Comment, CommentTarget, Product};

pub(crate) const LOG_TARGET: &str = "market-db";

/// Environment variable pointing at a PEM bundle used instead of the platform trust store
pub const TLS_CA_FILE_ENV: &str = "MARKET_DB_TLS_CA_FILE";

pub type DbPool = Pool<AsyncPgConnection>;
pub type DbConnection<'a> = PooledConnection<'a, AsyncPgConnection>;

/// Migrations creating the `article`, `product` and `comment` tables.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Error, Debug)]
pub enum DbSetupError {
    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[from] ConnectionError),

    #[error("Failed to run migrations: {0}")]
    Migration(String),
}

/// Run all pending migrations against `database_url`.
///
/// Migrations need a synchronous connection, so they run on the blocking pool.
pub async fn run_migrations(database_url: &str) -> Result<(), DbSetupError> {
    info!(target: LOG_TARGET, "Running pending DB migrations");

    let database_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = diesel::pg::PgConnection::establish(&database_url)?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbSetupError::Migration(e.to_string()))?;
        Ok::<(), DbSetupError>(())
    })
    .await
    .map_err(|e| DbSetupError::Migration(format!("migration task join error: {e}")))??;

    info!(target: LOG_TARGET, "Pending DB migrations completed");
    Ok(())
}

/// Open an async connection over rustls.
///
/// Plugged into the pool manager as its custom setup.
pub fn establish_connection(config: &str) -> BoxFuture<'_, ConnectionResult<AsyncPgConnection>> {
    let fut = async {
        let rustls_config = make_rustls_config_from_env();
        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(rustls_config);
        let (client, conn) = tokio_postgres::connect(config, tls)
            .await
            .map_err(|e| ConnectionError::BadConnection(e.to_string()))?;

        AsyncPgConnection::try_from_client_and_connection(client, conn).await
    };
    fut.boxed()
}

fn make_rustls_config_from_env() -> ClientConfig {
    let Some(path) = std::env::var_os(TLS_CA_FILE_ENV) else {
        return ClientConfig::with_platform_verifier();
    };

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(err) => {
            warn!(target: LOG_TARGET, path = ?path, error = %err, "Failed to open CA file, falling back to platform verifier");
            return ClientConfig::with_platform_verifier();
        }
    };

    let certs: Result<Vec<_>, std::io::Error> = load_pem_certs(&mut BufReader::new(file)).collect();
    match certs {
        Ok(certs) => {
            let mut roots = RootCertStore::empty();
            for cert in certs {
                if let Err(err) = roots.add(cert) {
                    warn!(target: LOG_TARGET, error = %err, "Failed to add certificate to root store");
                }
            }
            let provider = rustls::crypto::ring::default_provider();
            ClientConfig::builder_with_provider(provider.into())
                .with_protocol_versions(&[&version::TLS13, &version::TLS12])
                .expect("valid TLS versions")
                .with_root_certificates(roots)
                .with_no_client_auth()
        }
        Err(err) => {
            warn!(target: LOG_TARGET, path = ?path, error = %err, "Failed to parse PEM certs, falling back to platform verifier");
            ClientConfig::with_platform_verifier()
        }
    }
}
