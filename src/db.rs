use crate::config::AppConfig;
use crate::errors::AppError;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

pub type DbPool = DatabaseConnection;

/// Pool tuning for the shop database.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl DbConfig {
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(8),
        }
    }

    /// Every connection to an in-memory SQLite URL opens its own empty
    /// database, so such pools are pinned to a single connection.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    /// `(max, min)` connections actually requested from the driver.
    fn pool_bounds(&self) -> (u32, u32) {
        if self.is_in_memory() {
            (1, 1)
        } else {
            (self.max_connections, self.min_connections.min(self.max_connections))
        }
    }

    fn connect_options(&self) -> ConnectOptions {
        let (max, min) = self.pool_bounds();
        let mut opt = ConnectOptions::new(self.url.clone());
        opt.max_connections(max)
            .min_connections(min)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.acquire_timeout)
            .sqlx_logging(false);
        // an idle in-memory connection takes the whole database with it
        if !self.is_in_memory() {
            opt.idle_timeout(self.idle_timeout);
        }
        opt
    }
}

impl From<&AppConfig> for DbConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
        }
    }
}

pub async fn establish_connection(database_url: &str) -> Result<DbPool, AppError> {
    establish_connection_with_config(&DbConfig::for_url(database_url)).await
}

pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, AppError> {
    let (max, _) = config.pool_bounds();
    debug!(in_memory = config.is_in_memory(), max_connections = max, "opening database pool");

    let pool = Database::connect(config.connect_options()).await?;
    info!(max_connections = max, "database pool ready");
    Ok(pool)
}

pub async fn establish_connection_from_app_config(cfg: &AppConfig) -> Result<DbPool, AppError> {
    establish_connection_with_config(&DbConfig::from(cfg)).await
}

/// Applies every pending migration from [`crate::migrator::Migrator`].
pub async fn run_migrations(pool: &DbPool) -> Result<(), AppError> {
    let started = Instant::now();
    match crate::migrator::Migrator::up(pool, None).await {
        Ok(()) => {
            info!(elapsed_ms = started.elapsed().as_millis() as u64, "migrations applied");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "migrations failed");
            Err(e.into())
        }
    }
}

/// Round-trips a ping before the server starts accepting requests.
pub async fn check_connection(pool: &DbPool) -> Result<(), AppError> {
    pool.ping().await.map_err(|e| {
        error!(error = %e, "database ping failed");
        AppError::from(e)
    })
}

pub async fn close_pool(pool: DbPool) -> Result<(), AppError> {
    info!("closing database pool");
    Ok(pool.close().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_urls_get_a_single_connection() {
        let memory = DbConfig::for_url("sqlite::memory:");
        assert!(memory.is_in_memory());
        assert_eq!(memory.pool_bounds(), (1, 1));

        let file = DbConfig {
            max_connections: 4,
            min_connections: 9,
            ..DbConfig::for_url("sqlite://autogarage.db?mode=rwc")
        };
        assert!(!file.is_in_memory());
        assert_eq!(file.pool_bounds(), (4, 4));
    }

    #[tokio::test]
    async fn in_memory_pool_migrates_and_pings() {
        let pool = establish_connection("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        assert!(check_connection(&pool).await.is_ok());
        close_pool(pool).await.unwrap();
    }
}
