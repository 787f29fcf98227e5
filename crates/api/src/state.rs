use std::sync::Arc;

use atelier_assistant::AssistantApi;
use atelier_cloud::StorageProvider;
use atelier_events::{EmailDelivery, EventBus};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`). The optional services are `None` when their configuration is
/// absent; the owning handlers answer 503 in that case.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: atelier_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<EventBus>,
    /// LLM provider client (chat assistant), if configured.
    pub assistant: Option<Arc<AssistantApi>>,
    /// Object-storage provider (covers, knowledge files), if configured.
    pub storage: Option<Arc<dyn StorageProvider>>,
    /// SMTP delivery for reminders, if configured.
    pub mailer: Option<Arc<EmailDelivery>>,
}
