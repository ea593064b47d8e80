//! Repository Implementation

use crate::StorageError;
use data_validator::TemperatureRecord;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

/// Table holding every persisted sample
pub const TABLE_NAME: &str = "temperature";

/// Pool size for file-backed databases
const MAX_CONNECTIONS: u32 = 4;

/// Handle to the append-only temperature store.
///
/// Cloning is cheap and every clone shares the same connection pool.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Open (or create) a SQLite database file and initialize its schema
    pub async fn connect(filename: &str) -> Result<Self, StorageError> {
        info!("Opening SQLite repository at {}", filename);
        let options = SqliteConnectOptions::new()
            .filename(filename)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        let repository = Self { pool };
        repository.init().await?;
        Ok(repository)
    }

    /// Create a private in-memory repository.
    ///
    /// The pool is pinned to one long-lived connection because every SQLite
    /// memory connection is its own database.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let repository = Self { pool };
        repository.init().await?;
        Ok(repository)
    }

    /// Create the temperature table if it does not exist yet.
    ///
    /// Returns `true` when the table was created by this call.
    pub async fn init(&self) -> Result<bool, StorageError> {
        let existing: Option<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(TABLE_NAME)
                .fetch_optional(&self.pool)
                .await?;

        if existing.is_some() {
            debug!("Table {} already present", TABLE_NAME);
            return Ok(false);
        }

        sqlx::query("CREATE TABLE temperature(time BIGINT, celsius REAL)")
            .execute(&self.pool)
            .await?;
        info!("Created table {}", TABLE_NAME);
        Ok(true)
    }

    /// Append a single record
    pub async fn append(&self, record: &TemperatureRecord) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO temperature (time, celsius) VALUES (?, ?)")
            .bind(record.timestamp)
            .bind(record.celsius)
            .execute(&self.pool)
            .await?;

        debug!(time = record.timestamp, celsius = record.celsius, "Appended record");
        Ok(())
    }

    /// Append records one after another. A failure part way leaves the
    /// earlier records in place.
    pub async fn append_all(&self, records: &[TemperatureRecord]) -> Result<(), StorageError> {
        for record in records {
            self.append(record).await?;
        }
        Ok(())
    }

    /// Records with `time >= start`, oldest first.
    ///
    /// With a non-negative `limit` only the `limit` newest qualifying records
    /// are kept: they are selected newest-first and then re-sorted
    /// chronologically. Equal timestamps rank by insertion order, the later
    /// insert counting as newer. A negative `limit` returns everything.
    pub async fn range_from(
        &self,
        start: i64,
        limit: i64,
    ) -> Result<Vec<TemperatureRecord>, StorageError> {
        // SQLite treats a negative LIMIT as unbounded
        let limit = if limit < 0 { -1 } else { limit };

        let rows: Vec<(i64, f64)> = sqlx::query_as(
            "SELECT time, celsius FROM (\
                SELECT rowid AS seq, time, celsius FROM temperature \
                WHERE time >= ? ORDER BY time DESC, rowid DESC LIMIT ?\
             ) ORDER BY time ASC, seq ASC",
        )
        .bind(start)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(timestamp, celsius)| TemperatureRecord { timestamp, celsius })
            .collect())
    }

    /// Get total record count
    pub async fn count(&self) -> Result<i64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM temperature")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Repository closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    async fn seeded(samples: &[(i64, f64)]) -> Repository {
        let repo = Repository::in_memory().await.unwrap();
        for &(timestamp, celsius) in samples {
            repo.append(&TemperatureRecord { timestamp, celsius }).await.unwrap();
        }
        repo
    }

    fn pairs(records: &[TemperatureRecord]) -> Vec<(i64, f64)> {
        records.iter().map(|r| (r.timestamp, r.celsius)).collect()
    }

    const FIVE: [(i64, f64); 5] = [(10, 1.0), (20, 2.0), (30, 3.0), (40, 4.0), (50, 5.0)];

    #[tokio::test]
    async fn test_append_and_count() {
        let repo = seeded(&FIVE).await;
        assert_eq!(repo.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_limit_keeps_newest_in_ascending_order() {
        let repo = seeded(&FIVE).await;
        let records = repo.range_from(0, 3).await.unwrap();
        assert_eq!(pairs(&records), vec![(30, 3.0), (40, 4.0), (50, 5.0)]);
    }

    #[tokio::test]
    async fn test_negative_limit_is_unbounded() {
        let repo = seeded(&FIVE).await;
        let records = repo.range_from(25, -1).await.unwrap();
        assert_eq!(pairs(&records), vec![(30, 3.0), (40, 4.0), (50, 5.0)]);

        let all = repo.range_from(0, -7).await.unwrap();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn test_zero_limit_and_empty_range() {
        let repo = seeded(&FIVE).await;
        assert!(repo.range_from(0, 0).await.unwrap().is_empty());
        assert!(repo.range_from(51, -1).await.unwrap().is_empty());
        assert_eq!(repo.range_from(50, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insertion_order_ranks_equal_timestamps() {
        let repo = seeded(&[(10, 1.0), (20, 2.0), (20, 3.0), (20, 4.0)]).await;

        let records = repo.range_from(0, 2).await.unwrap();
        assert_eq!(pairs(&records), vec![(20, 3.0), (20, 4.0)]);

        let records = repo.range_from(0, -1).await.unwrap();
        assert_eq!(pairs(&records), vec![(10, 1.0), (20, 2.0), (20, 3.0), (20, 4.0)]);
    }

    #[tokio::test]
    async fn test_out_of_order_appends_are_returned_sorted() {
        let repo = seeded(&[(50, 5.0), (10, 1.0), (30, 3.0)]).await;
        let records = repo.range_from(0, -1).await.unwrap();
        assert_eq!(pairs(&records), vec![(10, 1.0), (30, 3.0), (50, 5.0)]);
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let repo = Repository::in_memory().await.unwrap();
        assert!(!repo.init().await.unwrap());
        assert!(!repo.init().await.unwrap());

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(TABLE_NAME)
        .fetch_one(&repo.pool)
        .await
        .unwrap();
        assert_eq!(tables, 1);
    }

    #[tokio::test]
    async fn test_reopening_file_keeps_schema_and_data() {
        let path = std::env::temp_dir().join(format!("temper-{}.db", uuid::Uuid::new_v4()));
        let filename = path.to_str().unwrap().to_string();

        let repo = Repository::connect(&filename).await.unwrap();
        repo.append(&TemperatureRecord { timestamp: 1, celsius: 20.0 }).await.unwrap();
        repo.close().await;

        let reopened = Repository::connect(&filename).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
        reopened.close().await;

        let _ = std::fs::remove_file(&path);
    }

    /// Reference window: stable sort by time, keep the tail, which is already
    /// ascending with insertion order preserved among equal timestamps.
    fn model_window(samples: &[(i64, f64)], start: i64, limit: i64) -> Vec<(i64, f64)> {
        let mut qualifying: Vec<(i64, f64)> =
            samples.iter().copied().filter(|(t, _)| *t >= start).collect();
        qualifying.sort_by_key(|(t, _)| *t);
        if limit >= 0 {
            let keep = (limit as usize).min(qualifying.len());
            qualifying.split_off(qualifying.len() - keep)
        } else {
            qualifying
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_window_matches_model(
            times in proptest::collection::vec(0i64..100, 0..40),
            start in 0i64..110,
            limit in -2i64..45,
        ) {
            let samples: Vec<(i64, f64)> =
                times.iter().enumerate().map(|(i, &t)| (t, i as f64)).collect();

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let actual = runtime.block_on(async {
                let repo = seeded(&samples).await;
                repo.range_from(start, limit).await.unwrap()
            });

            prop_assert_eq!(pairs(&actual), model_window(&samples, start, limit));
        }
    }
}
