use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, DatabaseConnection};
use settings::Database;

mod settings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "txservice={level},server={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    let http = settings.server;
    let mut builder = engine::Engine::builder().serialize_writes(http.serialize_writes);
    if let Some(ms) = http.store_timeout_ms {
        builder = builder.store_timeout(Duration::from_millis(ms));
    }
    match &http.database {
        Database::Memory => tracing::info!("Using in-memory transaction store"),
        Database::Sqlite(path) => {
            tracing::info!("Using sqlite database at {path}");
            let db = connect(path, &http.pool)
                .await
                .inspect_err(|err| tracing::error!("failed to initialize database: {err}"))?;
            builder = builder.database(db);
        }
    }
    let engine = builder.build().await?;

    let addr = format!("{}:{}", http.bind, http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .inspect_err(|err| tracing::error!("failed to bind {addr}: {err}"))?;

    let grace = Duration::from_secs(http.shutdown_timeout_secs);
    if let Err(err) = server::run_with_listener(engine, listener, shutdown_signal(), grace).await {
        tracing::error!("server failed: {err}");
        return Err(err.into());
    }

    Ok(())
}

async fn connect(path: &str, pool: &settings::Pool) -> Result<DatabaseConnection, BoxError> {
    let mut options = ConnectOptions::new(format!("sqlite:{path}?mode=rwc"));
    options
        .max_connections(pool.max_connections)
        .min_connections(pool.min_connections)
        .max_lifetime(Duration::from_secs(pool.max_lifetime_secs))
        .sqlx_logging(false);

    let database = sea_orm::Database::connect(options).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

/// Resolves on SIGINT, and on SIGTERM, SIGHUP or SIGQUIT where available.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::hangup()),
            signal(SignalKind::quit()),
        ) {
            (Ok(mut term), Ok(mut hup), Ok(mut quit)) => {
                tokio::select! {
                    _ = term.recv() => {}
                    _ = hup.recv() => {}
                    _ = quit.recv() => {}
                }
            }
            _ => {
                tracing::error!("failed to install unix signal handlers");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("Shutting down server...");
}
