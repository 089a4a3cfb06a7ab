//! Application state shared across all request handlers.

use rachao_core::framework::DatabaseProcessor;
use rachao_core::processors::OverallProducer;
use sqlx::PgPool;

/// Application state that is shared across all request handlers.
///
/// Cloneable and cheap to pass around: the pool and the producer are both
/// handles to shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Publishes overall payloads after card, player and attribute writes.
    pub producer: OverallProducer,
}

impl AppState {
    pub fn new(db: PgPool, producer: OverallProducer) -> Self {
        Self { db, producer }
    }

    pub fn processor(&self) -> DatabaseProcessor {
        DatabaseProcessor::new(self.db.clone())
    }
}
