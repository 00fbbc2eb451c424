use diesel::prelude::*;
use diesel_migrations::MigrationHarness;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

/// Setup a market database (thru a container), migrate it and run the provided raw SQL queries
///
/// # Arguments:
/// * post_migrations: a vector of raw SQL queries to run after migrations
pub async fn setup_test_db(post_migrations: Vec<String>) -> (ContainerAsync<Postgres>, String) {
    let container = Postgres::default()
        .with_db_name("market")
        .with_user("postgres")
        .with_password("postgres")
        .with_tag("15")
        .start()
        .await
        .expect("Failed to start postgres container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get port");
    let database_url = format!("postgres://postgres:postgres@{}:{}/market", host, port);

    let mut conn =
        diesel::PgConnection::establish(&database_url).expect("Failed to connect for migrations");
    conn.run_pending_migrations(market_db::MIGRATIONS)
        .expect("Failed to run migrations");

    for (i, query) in post_migrations.into_iter().enumerate() {
        diesel::RunQueryDsl::execute(diesel::sql_query(query), &mut conn)
            .unwrap_or_else(|e| panic!("Failed to execute init SQL #{i}: {e:?}"));
    }

    (container, database_url)
}
