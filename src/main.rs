use std::net::SocketAddr;
use std::sync::Arc;

use lead_capture_api::config::Config;
use lead_capture_api::db::Database;
use lead_capture_api::db_storage::PgDocumentStore;
use lead_capture_api::email_client::{EmailTransport, HttpEmailClient, LogOnlyTransport, Mailer};
use lead_capture_api::handlers::AppState;
use lead_capture_api::leads::LeadService;
use lead_capture_api::notifier::Notifier;
use lead_capture_api::routes;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes tracing, configuration, the document store, the email
/// transport and the HTTP router, then serves until the process exits.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_capture_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database connection pool
    let db = Database::new(&config.database_url).await?;
    tracing::info!("Database connection pool established");

    let store = Arc::new(PgDocumentStore::new(
        db.pool.clone(),
        config.leads_collection.clone(),
    ));

    let transport: Arc<dyn EmailTransport> = match &config.email_api_key {
        Some(key) => {
            let client = HttpEmailClient::new(config.email_api_base_url.clone(), key.clone())?;
            tracing::info!("✓ Email client initialized: {}", config.email_api_base_url);
            Arc::new(client)
        }
        None => Arc::new(LogOnlyTransport),
    };

    let mailer = Mailer::new(transport, config.email_from.clone());
    let notifier = Notifier::new(mailer, config.admin_email.clone(), config.brand_name.clone());

    // Build application state
    let app_state = Arc::new(AppState {
        config: config.clone(),
        leads: LeadService::new(store, notifier),
    });

    let app = routes::build_rate_limited_router(app_state)?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
