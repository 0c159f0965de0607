use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod database;
mod error;
mod jwt;
mod middleware;
mod models;
mod pagination;
mod repositories;
mod routes;
mod validation;

use crate::jwt::JwtService;
use crate::repositories::{MenuRepository, ReservationRepository, UserRepository};

/// Application state shared across handlers. Repositories and the JWT
/// service are constructed once at startup and injected explicitly.
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub menu_repository: MenuRepository,
    pub reservation_repository: ReservationRepository,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting hotel management service");

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");

    // Initialize JWT service
    let jwt_config = jwt::JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    let app_state = AppState {
        jwt_service,
        user_repository: UserRepository::new(pool.clone()),
        menu_repository: MenuRepository::new(pool.clone()),
        reservation_repository: ReservationRepository::new(pool),
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Hotel management service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
