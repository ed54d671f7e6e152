//! Per-collection snapshot channels shared by the store implementations.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use super::traits::{order_by_date_desc, Collection, Document, Subscription};

/// Publishes full, ordered collection snapshots to every live subscription
pub struct SnapshotPublisher {
    expenses: watch::Sender<Arc<Vec<Document>>>,
    savings: watch::Sender<Arc<Vec<Document>>>,
}

impl SnapshotPublisher {
    pub fn new() -> Self {
        let (expenses, _) = watch::channel(Arc::new(Vec::new()));
        let (savings, _) = watch::channel(Arc::new(Vec::new()));
        Self { expenses, savings }
    }

    fn sender(&self, collection: Collection) -> &watch::Sender<Arc<Vec<Document>>> {
        match collection {
            Collection::Expenses => &self.expenses,
            Collection::Savings => &self.savings,
        }
    }

    /// Replace the published snapshot of a collection
    pub fn publish(&self, collection: Collection, mut documents: Vec<Document>) {
        order_by_date_desc(&mut documents);
        debug!("Publishing {} snapshot with {} records", collection, documents.len());
        self.sender(collection).send_replace(Arc::new(documents));
    }

    pub fn subscribe(&self, collection: Collection) -> Subscription {
        Subscription::new(collection, self.sender(collection).subscribe())
    }
}

impl Default for SnapshotPublisher {
    fn default() -> Self {
        Self::new()
    }
}
