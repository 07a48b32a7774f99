use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use api::jwt::{JwtConfig, JwtService};
use api::{AppState, routes};
use common::database;
use common::error::DatabaseError;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Q&A API service");

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Apply schema migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    info!("Database migrations applied");

    // Initialize JWT service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    let app_state = AppState::new(pool, jwt_service);

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Q&A API service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
