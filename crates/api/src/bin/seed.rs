//! Load the sample dataset into an empty database.
//!
//! Uses the same `DATABASE_URL` and `UPLOAD_DIR` as the server. Refuses to
//! run against a database that already holds collections.

use mycotheca_core::uploads::LocalContentStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mycotheca_api::config::ServerConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mycotheca_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    let pool = mycotheca_db::create_pool(&config.database_url)
        .await
        .expect("Failed to open database");
    mycotheca_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let store = LocalContentStore::new(&config.upload_dir);
    store
        .ensure_root()
        .await
        .expect("Failed to create upload directory");

    match mycotheca_db::seed::load_sample_data(&pool, &store).await {
        Ok(report) => tracing::info!(
            collections = report.collections,
            images = report.images,
            isolates = report.isolates,
            subcultures = report.subcultures,
            experiments = report.experiments,
            "Sample data loaded"
        ),
        Err(e) => {
            tracing::error!(error = %e, "Sample data not loaded");
            std::process::exit(1);
        }
    }
}
