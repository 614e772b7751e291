use fintrack::{
    config::{
        reaper::ReaperConfig,
        session::{validate_production_config, SessionConfig},
    },
    db,
    repositories::SqliteUserRepository,
    router::build_router,
    services::{AuthService, Reaper, UserService},
    AppState,
};

use std::{net::SocketAddr, sync::Arc};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fintrack=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let pool = db::create_pool().await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Wire repositories and services
    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let user_service = Arc::new(UserService::new(user_repository.clone()));
    let auth_service = Arc::new(AuthService::new(user_repository.clone()));

    let app_state = AppState {
        user_service,
        auth_service,
        user_repository: user_repository.clone(),
        pool: pool.clone(),
    };

    // Session store
    validate_production_config();
    let session_store = SqliteStore::new(pool.clone())
        .with_table_name("sessions")
        .expect("Invalid session table name for sessions");
    session_store.migrate().await?;

    let session_layer = SessionConfig::from_env().create_layer(session_store);

    // Background reaper: purges accounts inactive beyond the threshold
    let reaper = Reaper::new(user_repository, ReaperConfig::from_env());
    tokio::spawn(reaper.run());

    let app = build_router(app_state, session_layer);

    // Start server
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()?;

    let addr = SocketAddr::from((host.parse::<std::net::IpAddr>()?, port));

    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
