//! `slog` loggers handed to the services. Request-scoped diagnostics go
//! through `tracing`; these carry the per-component business log lines
//! (job numbers, stock movements, invoice numbers).

use crate::config::AppConfig;
use slog::{o, Discard, Drain, Logger};
use slog_async::Async;
use slog_term::{FullFormat, TermDecorator};

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub async_buffer_size: usize,
    pub use_color: bool,
    pub environment: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            async_buffer_size: 1024,
            use_color: true,
            environment: "development".to_string(),
        }
    }
}

impl From<&AppConfig> for LoggerConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            use_color: !cfg.log_json && !cfg.is_production(),
            environment: cfg.environment.clone(),
            ..Self::default()
        }
    }
}

pub fn setup_logger(config: LoggerConfig) -> Logger {
    let decorator = if config.use_color {
        TermDecorator::new().force_color().build()
    } else {
        TermDecorator::new().force_plain().build()
    };
    let drain = FullFormat::new(decorator).build().fuse();
    let drain = Async::new(drain)
        .chan_size(config.async_buffer_size)
        .build()
        .fuse();

    Logger::root(
        drain,
        o!(
            "service" => env!("CARGO_PKG_NAME"),
            "version" => env!("CARGO_PKG_VERSION"),
            "env" => config.environment,
        ),
    )
}

/// Drops every record.
pub fn discard_logger() -> Logger {
    Logger::root(Discard, o!())
}

pub fn component_logger(root: &Logger, component: &'static str) -> Logger {
    root.new(o!("component" => component))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_logger_accepts_records() {
        let logger = component_logger(&discard_logger(), "job_cards");
        slog::info!(logger, "job card created"; "job_no" => "JC-2026-001");
    }

    #[test]
    fn production_config_turns_colour_off() {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            5000,
            "production".into(),
        );
        assert!(!LoggerConfig::from(&cfg).use_color);

        cfg.environment = "development".into();
        let dev = LoggerConfig::from(&cfg);
        assert!(dev.use_color);
        assert_eq!(dev.environment, "development");
    }
}
