//! Runtime settings for the garage API.
//!
//! Sources, lowest precedence first: built-in defaults, `config/default.toml`,
//! `config/{RUN_ENV}.toml`, then `APP__*` environment variables
//! (`APP__DEFAULT_GST_PERCENT=12`).

use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::{env, time::Duration};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

const CONFIG_DIR: &str = "config";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

mod defaults {
    pub const ENVIRONMENT: &str = "development";
    pub const DATABASE_URL: &str = "sqlite://autogarage.db?mode=rwc";
    pub const HOST: &str = "0.0.0.0";
    pub const USER_PASSWORD: &str = "password123";

    pub fn port() -> u16 {
        5000
    }
    pub fn log_level() -> String {
        "info".into()
    }
    pub fn db_max_connections() -> u32 {
        10
    }
    pub fn db_min_connections() -> u32 {
        1
    }
    pub fn db_connect_timeout_secs() -> u64 {
        30
    }
    pub fn db_idle_timeout_secs() -> u64 {
        600
    }
    pub fn db_acquire_timeout_secs() -> u64 {
        8
    }
    pub fn session_cookie_name() -> String {
        "autogarage.sid".into()
    }
    pub fn session_ttl_hours() -> u64 {
        24
    }
    pub fn session_sweep_interval_secs() -> u64 {
        600
    }
    pub fn user_email() -> String {
        "Autogarage@system.com".into()
    }
    pub fn user_password() -> String {
        USER_PASSWORD.into()
    }
    pub fn gst_percent() -> u32 {
        18
    }
    pub fn business() -> String {
        "Auto Gamma".into()
    }
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[validate(length(min = 1))]
    pub database_url: String,
    pub host: String,
    #[serde(default = "defaults::port")]
    pub port: u16,
    /// `development`, `production`, or any profile name under `config/`
    pub environment: String,

    #[serde(default = "defaults::log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_json: bool,

    #[serde(default)]
    pub auto_migrate: bool,

    /// Comma-separated origins allowed to call the API with credentials
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,
    #[serde(default)]
    pub cors_allow_any_origin: bool,

    #[serde(default = "defaults::db_max_connections")]
    #[validate(range(min = 1))]
    pub db_max_connections: u32,
    #[serde(default = "defaults::db_min_connections")]
    pub db_min_connections: u32,
    #[serde(default = "defaults::db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "defaults::db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,
    #[serde(default = "defaults::db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,

    #[serde(default = "defaults::session_cookie_name")]
    #[validate(length(min = 1))]
    pub session_cookie_name: String,
    #[serde(default = "defaults::session_ttl_hours")]
    #[validate(range(min = 1, max = 720))]
    pub session_ttl_hours: u64,
    #[serde(default = "defaults::session_sweep_interval_secs")]
    #[validate(range(min = 1))]
    pub session_sweep_interval_secs: u64,
    /// Unset means `Secure` only in production
    #[serde(default)]
    pub session_cookie_secure: Option<bool>,

    /// Login seeded at startup when no user with this email exists
    #[serde(default = "defaults::user_email")]
    #[validate(email)]
    pub default_user_email: String,
    #[serde(default = "defaults::user_password")]
    #[validate(length(min = 6))]
    pub default_user_password: String,

    /// Applied when a job card arrives without a GST percent
    #[serde(default = "defaults::gst_percent")]
    #[validate(range(max = 100))]
    pub default_gst_percent: u32,
    /// Stamped on invoices generated without a business name
    #[serde(default = "defaults::business")]
    #[validate(length(min = 1))]
    pub default_business: String,
}

impl AppConfig {
    /// Every tunable at its default; used by tests and tools.
    pub fn new(database_url: String, host: String, port: u16, environment: String) -> Self {
        Self {
            database_url,
            host,
            port,
            environment,
            log_level: defaults::log_level(),
            log_json: false,
            auto_migrate: false,
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
            db_max_connections: defaults::db_max_connections(),
            db_min_connections: defaults::db_min_connections(),
            db_connect_timeout_secs: defaults::db_connect_timeout_secs(),
            db_idle_timeout_secs: defaults::db_idle_timeout_secs(),
            db_acquire_timeout_secs: defaults::db_acquire_timeout_secs(),
            session_cookie_name: defaults::session_cookie_name(),
            session_ttl_hours: defaults::session_ttl_hours(),
            session_sweep_interval_secs: defaults::session_sweep_interval_secs(),
            session_cookie_secure: None,
            default_user_email: defaults::user_email(),
            default_user_password: defaults::user_password(),
            default_gst_percent: defaults::gst_percent(),
            default_business: defaults::business(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    pub fn has_cors_allowed_origins(&self) -> bool {
        self.cors_allowed_origins
            .as_deref()
            .is_some_and(|raw| raw.split(',').any(|origin| !origin.trim().is_empty()))
    }

    pub fn should_allow_permissive_cors(&self) -> bool {
        self.is_development() || self.cors_allow_any_origin
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_hours * 3600)
    }

    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure.unwrap_or_else(|| self.is_production())
    }

    pub fn default_gst(&self) -> Decimal {
        Decimal::from(self.default_gst_percent)
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Rules that span several fields or depend on the environment.
    fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.should_allow_permissive_cors() && !self.has_cors_allowed_origins() {
            errors.add(
                "cors_allowed_origins",
                invalid(
                    "cors_allowed_origins_required",
                    "set APP__CORS_ALLOWED_ORIGINS, or APP__CORS_ALLOW_ANY_ORIGIN=true to opt out",
                ),
            );
        }

        if self.is_production() && self.default_user_password == defaults::USER_PASSWORD {
            errors.add(
                "default_user_password",
                invalid(
                    "default_user_password_unchanged",
                    "set APP__DEFAULT_USER_PASSWORD before running in production",
                ),
            );
        }

        if self.db_min_connections > self.db_max_connections {
            errors.add(
                "db_min_connections",
                invalid("db_pool_bounds", "must not exceed db_max_connections"),
            );
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        Ok(())
    } else {
        Err(invalid("log_level", "must be one of trace, debug, info, warn, error"))
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("could not read configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Installs the global `tracing` subscriber. `RUST_LOG`, when set, wins over
/// the configured level.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| format!("autogarage_api={level},tower_http={level}"));

    let builder = fmt().with_env_filter(EnvFilter::new(filter));
    // a second call (tests, tools) keeps the first subscriber
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Reads the profile named by `RUN_ENV` (or `APP_ENV`), defaulting to
/// `development`.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| defaults::ENVIRONMENT.to_string());

    let app_config: AppConfig = Config::builder()
        .set_default("database_url", defaults::DATABASE_URL)?
        .set_default("host", defaults::HOST)?
        .set_default("environment", run_env.as_str())?
        .set_default("auto_migrate", true)?
        .add_source(File::with_name(&format!("{CONFIG_DIR}/default")).required(false))
        .add_source(File::with_name(&format!("{CONFIG_DIR}/{run_env}")).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize()?;

    app_config.validate()?;
    app_config.validate_additional_constraints()?;
    Ok(app_config)
}
