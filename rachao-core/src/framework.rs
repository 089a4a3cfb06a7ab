use sqlx::PgPool;

/// Runs the `kanau` [`Processor`](kanau::processor::Processor) queries of
/// [`crate::entities`] against the connection pool.
///
/// Cloning is cheap: the pool is reference counted.
#[derive(Debug, Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}

impl DatabaseProcessor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
