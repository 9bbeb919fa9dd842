// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use reminded_backend::config::Config;
use reminded_backend::extraction::GeminiExtractor;
use reminded_backend::review::ReviewSessions;
use reminded_backend::routes;
use reminded_backend::state::AppState;
use reminded_backend::storage::MaterialStorage;
use reminded_backend::stores::PgQuestionStore;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    // Seed the dropdown reference tables
    if let Err(e) = seed_reference_data(&pool).await {
        tracing::error!("Failed to seed reference data: {:?}", e);
    }

    let storage = MaterialStorage::new(&config.storage_base_url)
        .expect("STORAGE_BASE_URL is not a valid URL");

    // Create AppState
    let state = AppState {
        pool: pool.clone(),
        config: config.clone(),
        sessions: Arc::new(ReviewSessions::new()),
        extractor: Arc::new(GeminiExtractor::new(&config)),
        questions: Arc::new(PgQuestionStore::new(pool)),
        storage: Arc::new(storage),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}

/// Seeds academic levels and programs on first boot so the setup and
/// course-creation dropdowns are never empty.
async fn seed_reference_data(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let level_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM academic_levels")
        .fetch_one(pool)
        .await?;

    if level_count == 0 {
        tracing::info!("Seeding academic levels...");
        for name in ["1st Year", "2nd Year", "3rd Year", "4th Year"] {
            sqlx::query("INSERT INTO academic_levels (name) VALUES ($1)")
                .bind(name)
                .execute(pool)
                .await?;
        }
    }

    let program_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM programs")
        .fetch_one(pool)
        .await?;

    if program_count == 0 {
        tracing::info!("Seeding programs...");
        for name in [
            "Computer Science",
            "Information Technology",
            "Nursing",
            "Business Administration",
        ] {
            sqlx::query("INSERT INTO programs (name) VALUES ($1)")
                .bind(name)
                .execute(pool)
                .await?;
        }
    }

    Ok(())
}
