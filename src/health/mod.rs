/*!
 * Unauthenticated probes for the garage API.
 *
 * - `/health` reports the database and schema checks
 * - `/health/ready` fails while either check is down
 * - `/health/live` answers as long as the process runs
 * - `/health/version` echoes the build stamp from `build.rs`
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use crate::migrator::Migrator;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

impl HealthStatus {
    fn http(self) -> StatusCode {
        match self {
            HealthStatus::Up => StatusCode::OK,
            HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CheckResult {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    fn up() -> Self {
        Self {
            status: HealthStatus::Up,
            message: None,
        }
    }

    fn down(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Down,
            message: Some(message.into()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub checks: BTreeMap<String, CheckResult>,
}

pub struct HealthState {
    db: Arc<DatabaseConnection>,
    started: Instant,
}

impl HealthState {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            started: Instant::now(),
        }
    }

    pub fn uptime(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    async fn database(&self) -> CheckResult {
        match self.db.ping().await {
            Ok(()) => CheckResult::up(),
            Err(e) => {
                warn!(error = %e, "database probe failed");
                CheckResult::down(e.to_string())
            }
        }
    }

    /// Down while migrations are pending, e.g. when `auto_migrate` is off
    /// and the schema has not been applied yet.
    async fn schema(&self) -> CheckResult {
        match Migrator::get_pending_migrations(self.db.as_ref()).await {
            Ok(pending) if pending.is_empty() => CheckResult::up(),
            Ok(pending) => CheckResult::down(format!("{} migration(s) pending", pending.len())),
            Err(e) => CheckResult::down(e.to_string()),
        }
    }

    pub async fn check(&self) -> HealthReport {
        let mut checks = BTreeMap::new();
        checks.insert("database".to_string(), self.database().await);
        checks.insert("schema".to_string(), self.schema().await);

        let status = if checks.values().all(|c| c.status == HealthStatus::Up) {
            HealthStatus::Up
        } else {
            HealthStatus::Down
        };

        HealthReport {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            uptime_seconds: self.uptime(),
            checks,
        }
    }
}

pub async fn health_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let report = state.check().await;
    (report.status.http(), Json(report))
}

pub async fn readiness_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let report = state.check().await;
    let ready = report.status == HealthStatus::Up;
    (
        report.status.http(),
        Json(json!({ "ready": ready, "timestamp": report.timestamp })),
    )
}

pub async fn liveness_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    Json(json!({
        "alive": true,
        "uptime_seconds": state.uptime(),
    }))
}

pub async fn version_info() -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "commit": option_env!("GIT_HASH").unwrap_or("unknown"),
        "built": option_env!("BUILD_TIME").unwrap_or("unknown"),
    }))
}

/// Carries its own state so it nests under any app router.
pub fn health_routes<S>(db: Arc<DatabaseConnection>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
        .route("/version", get(version_info))
        .with_state(Arc::new(HealthState::new(db)))
}
