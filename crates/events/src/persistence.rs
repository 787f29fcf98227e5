//! Event persistence subscriber.
//!
//! Writes every [`PlatformEvent`] published on the bus to the `events` audit
//! table. Runs as a spawned task; exits when the bus sender is dropped.

use atelier_db::repositories::EventRepo;
use atelier_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::PlatformEvent;

/// Background subscriber persisting bus events to the database.
pub struct EventPersistence;

impl EventPersistence {
    /// Consume events from `receiver` until the channel closes.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let result = EventRepo::insert(
                        &pool,
                        &event.event_type,
                        event.source_entity_type.as_deref(),
                        event.source_entity_id,
                        event.actor_user_id,
                        &event.payload,
                    )
                    .await;
                    if let Err(e) = result {
                        tracing::error!(
                            event_type = %event.event_type,
                            error = %e,
                            "Failed to persist event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event persistence lagged; events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed; persistence stopping");
                    break;
                }
            }
        }
    }
}
