//! Database metrics collection.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Duration after which a query is logged as slow.
pub const SLOW_QUERY_SECS: f64 = 1.0;

/// Record database query duration.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Record database connection pool metrics.
///
/// Called on every scrape of the metrics endpoint.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Times one repository call.
///
/// ```ignore
/// let timer = QueryTimer::new("lock_assets");
/// let rows = sqlx::query_as::<_, LockedAssetEntity>(...).fetch_all(&mut *conn).await;
/// timer.record();
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    ///
    /// Queries slower than [`SLOW_QUERY_SECS`] are also logged; under the
    /// ledger's row locks these are usually lock waits.
    pub fn record(self) {
        let elapsed = self.start.elapsed().as_secs_f64();
        if elapsed >= SLOW_QUERY_SECS {
            tracing::warn!(query = self.query_name, elapsed_secs = elapsed, "Slow query");
        }
        record_query_duration(self.query_name, elapsed);
    }
}
