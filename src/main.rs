use task_tracker_api::{app, config, database, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!(
        "starting task-tracker-api in {:?} mode",
        config.environment
    );

    let pool = database::connect(&config.database.url, config.database.max_connections).await?;
    let state = AppState::init(pool).await?;
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("task-tracker-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
