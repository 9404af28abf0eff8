use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use tokio::{signal, sync::mpsc};
use tracing::{error, info};

use autogarage_api as api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = api::config::load_config().context("failed to load configuration")?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Init DB
    let db_pool = api::db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;
    api::db::check_connection(&db_pool)
        .await
        .context("database did not answer the startup ping")?;
    if cfg.auto_migrate {
        api::db::run_migrations(&db_pool)
            .await
            .context("failed to apply migrations")?;
    }
    let db_arc = Arc::new(db_pool);

    // Init events
    let (event_tx, event_rx) = mpsc::channel(1024);
    let event_sender = Arc::new(api::events::EventSender::new(event_tx));
    tokio::spawn(api::events::process_events(event_rx));

    let base_logger = api::logging::setup_logger(api::logging::LoggerConfig::from(&cfg));
    let state = api::AppState::new(db_arc.clone(), cfg.clone(), event_sender, &base_logger);

    // Seed the login account on an empty user table
    let seeded = state
        .services
        .users
        .ensure_default_user(&cfg.default_user_email, &cfg.default_user_password)
        .await
        .context("failed to seed the default user")?;
    if seeded {
        info!(email = %cfg.default_user_email, "created default user");
    }

    let _sweeper = state
        .sessions
        .spawn_sweeper(Duration::from_secs(cfg.session_sweep_interval_secs));

    let app = api::build_router(state);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cfg.host, cfg.port))?;
    info!("autogarage-api listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Ok(pool) = Arc::try_unwrap(db_arc) {
        api::db::close_pool(pool).await?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
