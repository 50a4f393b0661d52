//! Result Store
//!
//! Append-only classification history with a "most recent" query.
//! Records are never updated or deleted here.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{ClassificationRecord, NewClassification};

#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Append one record. Not idempotent.
    async fn insert(&self, record: &NewClassification) -> Result<(), StoreError>;

    /// Record with the greatest timestamp at query time, if any
    async fn fetch_latest(&self) -> Result<Option<ClassificationRecord>, StoreError>;
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgResultStore {
    pool: PgPool,
}

impl PgResultStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultStore for PgResultStore {
    async fn insert(&self, record: &NewClassification) -> Result<(), StoreError> {
        tracing::debug!(
            url = %record.url,
            is_phishing = record.is_phishing,
            probability = record.probability,
            "Adding classification"
        );

        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO phishing_data (url, is_phishing, probability)
            VALUES ($1, $2, $3)
            RETURNING id
            "#
        )
        .bind(&record.url)
        .bind(record.is_phishing)
        .bind(record.probability)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Classification {} stored for {}", row.0, record.url);
        Ok(())
    }

    async fn fetch_latest(&self) -> Result<Option<ClassificationRecord>, StoreError> {
        let record = sqlx::query_as::<_, ClassificationRecord>(
            r#"
            SELECT id, url, is_phishing, probability, timestamp
            FROM phishing_data
            ORDER BY timestamp DESC, id DESC
            LIMIT 1
            "#
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

/// Volatile in-process store with the same contract
#[derive(Debug, Default)]
pub struct MemoryResultStore {
    records: RwLock<Vec<ClassificationRecord>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn insert(&self, record: &NewClassification) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let id = records.len() as i64 + 1;

        records.push(ClassificationRecord {
            id,
            url: record.url.clone(),
            is_phishing: record.is_phishing,
            probability: record.probability,
            timestamp: Utc::now(),
        });

        tracing::info!("Classification {} stored for {}", id, record.url);
        Ok(())
    }

    async fn fetch_latest(&self) -> Result<Option<ClassificationRecord>, StoreError> {
        let records = self.records.read().await;

        Ok(records
            .iter()
            .max_by_key(|r| (r.timestamp, r.id))
            .cloned())
    }
}
