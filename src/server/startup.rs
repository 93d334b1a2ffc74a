use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::server::{
    config::Config,
    error::Error,
    service::{
        lock::{DatabaseLock, LockCoordinator, RedisLock},
        orchestrator::{PipelineOrchestrator, UpstreamUrls},
        retention::RetentionService,
    },
};

/// Timeout applied to every upstream request.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Connect to Valkey/Redis for the run lock
pub async fn connect_to_valkey(valkey_url: &str) -> Result<fred::prelude::Pool, Error> {
    use fred::prelude::{ClientLike, Config as RedisConfig, Pool};

    let redis_config = RedisConfig::from_url(valkey_url)?;
    let pool = Pool::new(redis_config, None, None, None, 2)?;

    pool.connect();
    pool.wait_for_connect().await?;

    Ok(pool)
}

/// Build the HTTP client shared by zKillboard and ESI requests
pub fn build_http_client(config: &Config) -> Result<reqwest::Client, Error> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(HTTP_TIMEOUT)
        .gzip(true)
        .build()?;

    Ok(client)
}

/// Pick the lock backend: Valkey when configured, otherwise the database
pub async fn build_lock_coordinator(
    config: &Config,
    db: &DatabaseConnection,
) -> Result<LockCoordinator, Error> {
    match &config.valkey_url {
        Some(url) => {
            let pool = connect_to_valkey(url).await?;
            tracing::debug!("Using Valkey for the run lock");
            Ok(LockCoordinator::Redis(RedisLock::new(pool)))
        }
        None => {
            tracing::debug!("VALKEY_URL not set, using the database for the run lock");
            Ok(LockCoordinator::Database(DatabaseLock::new(db.clone())))
        }
    }
}

pub async fn build_orchestrator(
    config: &Config,
    db: DatabaseConnection,
) -> Result<PipelineOrchestrator, Error> {
    let lock = build_lock_coordinator(config, &db).await?;
    let http = build_http_client(config)?;

    Ok(PipelineOrchestrator::new(
        db,
        lock,
        http,
        UpstreamUrls {
            zkill: config.zkill_url.clone(),
            esi: config.esi_url.clone(),
        },
        config.pipeline.clone(),
    ))
}

pub fn build_retention(config: &Config, db: DatabaseConnection) -> RetentionService {
    RetentionService::new(db, config.retention_days)
}
