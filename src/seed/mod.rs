//! Seed import
//!
//! Fills the record store from an external JSON array of sale records. The
//! import is idempotent: a populated store is left alone unless the caller
//! forces a reload, in which case every record is replaced in one transaction.

pub mod config;
pub mod routes;
pub mod source;

use crate::database::{DatabaseError, DatabaseManager, entities::transactions};
use crate::query::TransactionFilter;
use sea_orm::{ActiveValue::NotSet, Set};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

pub use config::SeedConfig;
pub use routes::create_seed_routes;
pub use source::{FileSeedSource, HttpSeedSource, SeedSource};

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to fetch seed data: {0}")]
    Fetch(String),
    #[error("Seed source responded with status {0}")]
    Status(u16),
    #[error("Failed to decode seed data: {0}")]
    Decode(String),
    #[error("Failed to read seed file: {0}")]
    Io(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// One record as published by the seed source. Unknown fields are ignored and
/// missing fields become null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedRecord {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub sold: Option<bool>,
    pub date_of_sale: Option<String>,
}

impl From<SeedRecord> for transactions::ActiveModel {
    fn from(record: SeedRecord) -> Self {
        transactions::ActiveModel {
            row_id: NotSet,
            id: Set(record.id),
            title: Set(record.title),
            description: Set(record.description),
            category: Set(record.category),
            price: Set(record.price),
            date_of_sale: Set(record.date_of_sale),
            sold: Set(record.sold),
            image: Set(record.image),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    pub inserted: u64,
    /// Records already in the store when the import was skipped
    pub existing: u64,
    pub skipped: bool,
}

impl SeedOutcome {
    pub fn message(&self) -> String {
        if self.skipped {
            format!(
                "Database already contains {} records; pass force=true to reload",
                self.existing
            )
        } else {
            "Database initialized with seed data".to_string()
        }
    }
}

pub struct SeedService {
    database: Arc<dyn DatabaseManager>,
    batch_size: usize,
    /// Held from the populated check until the write commits
    import_lock: Mutex<()>,
}

impl SeedService {
    pub fn new(database: Arc<dyn DatabaseManager>, batch_size: usize) -> Self {
        Self {
            database,
            batch_size,
            import_lock: Mutex::new(()),
        }
    }

    /// Imports run one at a time, so concurrent unforced calls on an empty
    /// store load the data once
    pub async fn import(
        &self,
        source: &dyn SeedSource,
        force: bool,
    ) -> Result<SeedOutcome, SeedError> {
        let _guard = self.import_lock.lock().await;
        let dao = self.database.transactions();
        let existing = dao.count(&TransactionFilter::all()).await?;

        if existing > 0 && !force {
            info!(existing, "Store already populated, skipping seed import");
            return Ok(SeedOutcome {
                inserted: 0,
                existing,
                skipped: true,
            });
        }

        info!(source = %source.describe(), force, "Importing seed data");
        let records: Vec<transactions::ActiveModel> = source
            .fetch()
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let inserted = if existing > 0 {
            dao.replace_all(records, self.batch_size).await?
        } else {
            dao.insert_many(records, self.batch_size).await?
        };

        info!(inserted, replaced = existing, "Seed import complete");
        Ok(SeedOutcome {
            inserted,
            existing,
            skipped: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestServerBuilder, sale};
    use async_trait::async_trait;

    struct StaticSource(Vec<SeedRecord>);

    #[async_trait]
    impl SeedSource for StaticSource {
        fn describe(&self) -> String {
            "static".to_string()
        }

        async fn fetch(&self) -> Result<Vec<SeedRecord>, SeedError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl SeedSource for FailingSource {
        fn describe(&self) -> String {
            "failing".to_string()
        }

        async fn fetch(&self) -> Result<Vec<SeedRecord>, SeedError> {
            Err(SeedError::Status(503))
        }
    }

    struct SlowSource(Vec<SeedRecord>);

    #[async_trait]
    impl SeedSource for SlowSource {
        fn describe(&self) -> String {
            "slow".to_string()
        }

        async fn fetch(&self) -> Result<Vec<SeedRecord>, SeedError> {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            Ok(self.0.clone())
        }
    }

    fn record(id: i64, title: &str) -> SeedRecord {
        SeedRecord {
            id: Some(id),
            title: Some(title.to_string()),
            price: Some(10.0),
            sold: Some(true),
            date_of_sale: Some("2022-01-05T10:00:00+05:30".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_seed_record_decodes_camel_case_and_ignores_unknown_fields() {
        let json = r#"{
            "id": 7,
            "title": "Backpack",
            "price": 109.95,
            "description": "Fits 15 inch laptops",
            "category": "men's clothing",
            "image": "https://example.com/7.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30",
            "rating": {"rate": 3.9}
        }"#;

        let record: SeedRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, Some(7));
        assert_eq!(record.price, Some(109.95));
        assert_eq!(
            record.date_of_sale.as_deref(),
            Some("2021-11-27T20:29:54+05:30")
        );
        assert_eq!(record.sold, Some(false));
    }

    #[test]
    fn test_seed_record_missing_fields_are_null() {
        let record: SeedRecord = serde_json::from_str(r#"{"title": "Only a title"}"#).unwrap();
        assert_eq!(record.title.as_deref(), Some("Only a title"));
        assert!(record.id.is_none());
        assert!(record.price.is_none());
        assert!(record.date_of_sale.is_none());
    }

    #[tokio::test]
    async fn test_import_into_empty_store() {
        let server = TestServerBuilder::new().build().await;
        let service = SeedService::new(server.database.clone(), 2);
        let source = StaticSource(vec![record(1, "a"), record(2, "b"), record(3, "c")]);

        let outcome = service.import(&source, false).await.unwrap();
        assert_eq!(outcome.inserted, 3);
        assert!(!outcome.skipped);
        assert_eq!(outcome.message(), "Database initialized with seed data");

        let stored = server
            .database
            .transactions()
            .find_all(&TransactionFilter::all())
            .await
            .unwrap();
        let titles: Vec<_> = stored.iter().filter_map(|r| r.title.as_deref()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_concurrent_imports_load_once() {
        let server = TestServerBuilder::new().build().await;
        let service = SeedService::new(server.database.clone(), 10);
        let source = SlowSource(vec![record(1, "a"), record(2, "b")]);

        let (first, second) = tokio::join!(
            service.import(&source, false),
            service.import(&source, false)
        );
        let (first, second) = (first.unwrap(), second.unwrap());

        assert_eq!(
            [first.skipped, second.skipped]
                .iter()
                .filter(|skipped| **skipped)
                .count(),
            1
        );
        assert_eq!(first.inserted + second.inserted, 2);
        assert_eq!(
            server
                .database
                .transactions()
                .count(&TransactionFilter::all())
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_import_skips_populated_store() {
        let server = TestServerBuilder::new().build().await;
        server
            .database
            .transactions()
            .insert(sale(1, 50.0, true, "2023-03-05T00:00:00Z"))
            .await
            .unwrap();

        let service = SeedService::new(server.database.clone(), 10);
        let outcome = service
            .import(&StaticSource(vec![record(2, "b")]), false)
            .await
            .unwrap();

        assert!(outcome.skipped);
        assert_eq!(outcome.inserted, 0);
        assert_eq!(outcome.existing, 1);
        assert_eq!(
            server
                .database
                .transactions()
                .count(&TransactionFilter::all())
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_forced_import_replaces_records() {
        let server = TestServerBuilder::new().build().await;
        server
            .database
            .transactions()
            .insert(sale(1, 50.0, true, "2023-03-05T00:00:00Z"))
            .await
            .unwrap();

        let service = SeedService::new(server.database.clone(), 10);
        let outcome = service
            .import(&StaticSource(vec![record(2, "b"), record(3, "c")]), true)
            .await
            .unwrap();

        assert_eq!(outcome.inserted, 2);
        assert_eq!(outcome.existing, 1);

        let stored = server
            .database
            .transactions()
            .find_all(&TransactionFilter::all())
            .await
            .unwrap();
        let ids: Vec<_> = stored.iter().filter_map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_store_untouched() {
        let server = TestServerBuilder::new().build().await;
        server
            .database
            .transactions()
            .insert(sale(1, 50.0, true, "2023-03-05T00:00:00Z"))
            .await
            .unwrap();

        let service = SeedService::new(server.database.clone(), 10);
        let err = service.import(&FailingSource, true).await.unwrap_err();
        assert!(matches!(err, SeedError::Status(503)));

        assert_eq!(
            server
                .database
                .transactions()
                .count(&TransactionFilter::all())
                .await
                .unwrap(),
            1
        );
    }
}
