//! # SQLite Record Store
//!
//! Durable document storage backed by a single `records` table. Each row keeps
//! the document fields as JSON next to the collection name and the date used
//! for ordering. Live queries are served from the same snapshot channels as
//! the in-memory store, refreshed from the table after every write. Writes and
//! their refresh run one at a time so snapshots are published in commit order.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Row, Sqlite, SqlitePool};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::snapshot::SnapshotPublisher;
use super::traits::{
    order_by_date_desc, Collection, Document, Fields, RecordStore, StoreError, Subscription,
    DATE_FIELD,
};

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(error.to_string())
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// SQLite-backed record store
pub struct SqliteStore {
    pool: SqlitePool,
    publisher: SnapshotPublisher,
    write_lock: Mutex<()>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `url` and load both collections
    pub async fn new(url: &str) -> Result<Self, StoreError> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database {}", url);
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePoolOptions::new().connect(url).await?;
        Self::setup_schema(&pool).await?;

        let store = Self {
            pool,
            publisher: SnapshotPublisher::new(),
            write_lock: Mutex::new(()),
        };
        for collection in Collection::ALL {
            store.refresh(collection).await?;
        }

        info!("SQLite record store ready at {}", url);
        Ok(store)
    }

    /// Open a private in-memory database
    #[cfg(test)]
    pub async fn init_test() -> Result<Self, StoreError> {
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", Uuid::new_v4());
        Self::new(&db_url).await
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id TEXT PRIMARY KEY,
                collection TEXT NOT NULL,
                date TEXT,
                fields TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS records_collection_date ON records (collection, date)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn load_collection(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query("SELECT id, fields FROM records WHERE collection = ?")
            .bind(collection.name())
            .fetch_all(&self.pool)
            .await?;

        let mut documents = Vec::with_capacity(rows.len());
        for row in rows {
            let id: Option<String> = row.try_get("id")?;
            let Some(id) = id else {
                return Err(StoreError::InvalidDocument(format!(
                    "{} record without an id",
                    collection
                )));
            };
            let raw: String = row.try_get("fields")?;
            match serde_json::from_str::<Fields>(&raw) {
                Ok(fields) => documents.push(Document::new(id, fields)),
                Err(e) => warn!(
                    "Skipping {} record {} with unreadable fields: {}",
                    collection, id, e
                ),
            }
        }

        order_by_date_desc(&mut documents);
        Ok(documents)
    }

    async fn refresh(&self, collection: Collection) -> Result<(), StoreError> {
        let documents = self.load_collection(collection).await?;
        self.publisher.publish(collection, documents);
        Ok(())
    }

    /// Republish after a committed write. A failed reload leaves the previous
    /// snapshot in place but never undoes the write.
    async fn refresh_after_write(&self, collection: Collection) {
        if let Err(e) = self.refresh(collection).await {
            warn!("{} write committed but snapshot reload failed: {}", collection, e);
        }
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn create_record(
        &self,
        collection: Collection,
        mut fields: Fields,
    ) -> Result<String, StoreError> {
        fields.remove("id");
        let id = Uuid::new_v4().to_string();
        let date = fields
            .get(DATE_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string);
        let raw = serde_json::to_string(&fields)
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;

        let _guard = self.write_lock.lock().await;
        sqlx::query("INSERT INTO records (id, collection, date, fields) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(collection.name())
            .bind(date)
            .bind(raw)
            .execute(&self.pool)
            .await?;

        debug!("Inserted {} record {}", collection, id);
        self.refresh_after_write(collection).await;
        Ok(id)
    }

    async fn delete_record(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let result = sqlx::query("DELETE FROM records WHERE collection = ? AND id = ?")
            .bind(collection.name())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection,
                id: id.to_string(),
            });
        }

        debug!("Deleted {} record {}", collection, id);
        self.refresh_after_write(collection).await;
        Ok(())
    }

    async fn list_all(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        self.load_collection(collection).await
    }

    fn observe(&self, collection: Collection) -> Result<Subscription, StoreError> {
        Ok(self.publisher.subscribe(collection))
    }
}
