//! # In-Memory Record Store
//!
//! A process-local document store with the same live-query behaviour as the
//! hosted store: every write republishes the full snapshot of the affected
//! collection. Snapshots are published while the write lock is held, so they
//! reach subscribers in commit order. It can be switched offline to simulate
//! an unreachable store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use super::snapshot::SnapshotPublisher;
use super::traits::{
    order_by_date_desc, Collection, Document, Fields, RecordStore, StoreError, Subscription,
};

struct MemoryInner {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
    publisher: SnapshotPublisher,
    available: AtomicBool,
}

/// In-memory record store
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                collections: RwLock::new(HashMap::new()),
                publisher: SnapshotPublisher::new(),
                available: AtomicBool::new(true),
            }),
        }
    }

    /// A store that rejects every read and write, used when the configured
    /// store could not be opened at startup
    pub fn unavailable() -> Self {
        let store = Self::new();
        store.set_available(false);
        store
    }

    /// Toggle simulated connectivity
    pub fn set_available(&self, available: bool) {
        info!("Memory store availability set to {}", available);
        self.inner.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.inner.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("store is offline".to_string()))
        }
    }

    fn poisoned() -> StoreError {
        StoreError::Backend("memory store lock poisoned".to_string())
    }

}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_record(
        &self,
        collection: Collection,
        fields: Fields,
    ) -> Result<String, StoreError> {
        self.ensure_available()?;

        let id = Uuid::new_v4().to_string();
        {
            let mut collections = self.inner.collections.write().map_err(|_| Self::poisoned())?;
            let documents = collections.entry(collection).or_default();
            documents.push(Document::new(id.clone(), fields));
            self.inner.publisher.publish(collection, documents.clone());
        }

        debug!("Created {} record {}", collection, id);
        Ok(id)
    }

    async fn delete_record(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.ensure_available()?;

        {
            let mut collections = self.inner.collections.write().map_err(|_| Self::poisoned())?;
            let documents = collections.entry(collection).or_default();
            let before = documents.len();
            documents.retain(|doc| doc.id != id);
            if documents.len() == before {
                return Err(StoreError::NotFound {
                    collection,
                    id: id.to_string(),
                });
            }
            self.inner.publisher.publish(collection, documents.clone());
        }

        debug!("Deleted {} record {}", collection, id);
        Ok(())
    }

    async fn list_all(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        self.ensure_available()?;

        let mut documents = {
            let collections = self.inner.collections.read().map_err(|_| Self::poisoned())?;
            collections.get(&collection).cloned().unwrap_or_default()
        };
        order_by_date_desc(&mut documents);
        Ok(documents)
    }

    fn observe(&self, collection: Collection) -> Result<Subscription, StoreError> {
        self.ensure_available()?;
        Ok(self.inner.publisher.subscribe(collection))
    }
}
