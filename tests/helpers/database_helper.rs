//! Test database helper utilities
//!
//! Every test gets its own SQLite file inside a temporary directory, so tests
//! run in parallel without sharing rows.

use std::sync::Once;
use tempfile::TempDir;
use FairBooking::config::DatabaseConfig;
use FairBooking::database::{create_pool, run_migrations, DatabasePool};
use FairBooking::Result;

static INIT: Once = Once::new();

/// Initialize logging for tests (called once)
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Migrated database living as long as the value
pub struct TestDatabase {
    pub pool: DatabasePool,
    _dir: TempDir,
}

impl TestDatabase {
    pub async fn new() -> Result<Self> {
        init_test_logging();

        let dir = tempfile::tempdir()?;
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("booking.db").display()),
            max_connections: 5,
            min_connections: 1,
        };

        let pool = create_pool(&config).await?;
        run_migrations(&pool).await?;

        Ok(Self { pool, _dir: dir })
    }

    pub async fn count_records(&self, table: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }
}
