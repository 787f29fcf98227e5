use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atelier_api::config::ServerConfig;
use atelier_api::router::build_app_router;
use atelier_api::{background, state::AppState};
use atelier_assistant::{AssistantApi, AssistantConfig};
use atelier_cloud::{S3Config, S3Provider, StorageProvider};
use atelier_events::{EmailConfig, EmailDelivery, EventBus, EventPersistence, ReminderScheduler};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atelier_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = atelier_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    atelier_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    atelier_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Optional external services ---
    let assistant = AssistantConfig::from_env().map(|c| Arc::new(AssistantApi::new(c)));
    if assistant.is_none() {
        tracing::warn!("LLM_API_KEY not set; chat assistant disabled");
    }

    let storage: Option<Arc<dyn StorageProvider>> = match S3Config::from_env() {
        Some(c) => Some(Arc::new(S3Provider::new(c).await)),
        None => {
            tracing::warn!("S3_BUCKET not set; file storage disabled");
            None
        }
    };

    let mailer = EmailConfig::from_env().map(|c| Arc::new(EmailDelivery::new(c)));
    if mailer.is_none() {
        tracing::warn!("SMTP_HOST not set; reminder emails disabled");
    }

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());

    // Spawn event persistence (writes all events to the database).
    let persistence_handle = tokio::spawn(EventPersistence::run(
        pool.clone(),
        event_bus.subscribe(),
    ));

    // --- Background jobs ---
    let jobs_cancel = CancellationToken::new();

    let reminder_scheduler =
        ReminderScheduler::new(pool.clone(), mailer.clone(), Arc::clone(&event_bus));
    let reminder_cancel = jobs_cancel.clone();
    let reminder_handle = tokio::spawn(async move {
        reminder_scheduler.run(reminder_cancel).await;
    });

    let purge_handle = tokio::spawn(background::session_purge::run(
        pool.clone(),
        jobs_cancel.clone(),
    ));

    tracing::info!("Background jobs started (reminder scheduler, session purge)");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
        assistant,
        storage,
        mailer,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    jobs_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), reminder_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), purge_handle).await;
    tracing::info!("Background jobs stopped");

    // Drop the event bus sender to close the broadcast channel, signalling
    // the persistence task to shut down.
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), persistence_handle).await;
    tracing::info!("Event persistence shut down");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
