use tk_server::{build_router, AppState, Config};

use std::error::Error;

use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logger (before any other logging)
    tk_server::logger::initialize(
        &config.log_level,
        config.log_file.clone().map(std::path::PathBuf::from),
        config.log_colored,
    )?;

    info!("Starting tk-server v{}", env!("CARGO_PKG_VERSION"));
    config.validate();

    // Initialize database pool
    info!("Connecting to database: {}", config.database_path);
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(&config.database_path)
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .busy_timeout(std::time::Duration::from_secs(5)),
        )
        .await?;

    info!("Database connection established");

    // Run migrations
    info!("Running database migrations...");
    tk_db::MIGRATOR.run(&pool).await?;
    info!("Migrations complete");

    // Build application state; absent secrets disable their capability
    // rather than failing startup
    let bind_addr = config.bind_addr;
    let state = AppState::from_config(&config, pool)?;

    // Build router
    let app = build_router(state);

    // Create TCP listener
    let listener = TcpListener::bind(&bind_addr).await?;
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {}", actual_addr);

    // Serve with graceful shutdown on Ctrl+C
    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received SIGINT (Ctrl+C), shutting down"),
                Err(e) => log::error!("Failed to listen for SIGINT: {}", e),
            }
        })
        .await?;

    info!("Graceful shutdown complete");
    Ok(())
}
