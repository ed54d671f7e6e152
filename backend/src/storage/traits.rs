//! # Storage Traits
//!
//! The record store is a document database holding two collections,
//! `expenses` and `savings`. The domain layer only ever talks to it through
//! [`RecordStore`], so the hosted store, the SQLite store and the in-memory
//! store used by tests are interchangeable.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Raw document fields, without the `id`
pub type Fields = Map<String, Value>;

/// Name of the field every collection is ordered by
pub const DATE_FIELD: &str = "date";

/// The two record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Expenses,
    Savings,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Expenses, Collection::Savings];

    /// Collection name as used by the store
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Expenses => "expenses",
            Collection::Savings => "savings",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "expenses" => Some(Collection::Expenses),
            "savings" => Some(Collection::Savings),
            _ => None,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stored record: the store-assigned id plus its fields
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, mut fields: Fields) -> Self {
        fields.remove("id");
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Parsed value of the `date` field, if present and RFC 3339
    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        self.fields
            .get(DATE_FIELD)
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }
}

/// Sort documents newest first. Undated documents go last; ties fall back to
/// the id, greatest first, so the order never depends on insertion order.
pub fn order_by_date_desc(documents: &mut [Document]) {
    documents.sort_by(|a, b| match (a.date(), b.date()) {
        (Some(da), Some(db)) => db.cmp(&da).then_with(|| b.id.cmp(&a.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.id.cmp(&a.id),
    });
}

/// Errors reported by a record store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record store is unavailable: {0}")]
    Unavailable(String),
    #[error("{collection} record {id} not found")]
    NotFound { collection: Collection, id: String },
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    #[error("record store error: {0}")]
    Backend(String),
}

/// A live query over one collection.
///
/// Each item is a complete, ordered snapshot of the collection; there is no
/// incremental patching. Dropping the subscription cancels it.
pub struct Subscription {
    collection: Collection,
    receiver: watch::Receiver<Arc<Vec<Document>>>,
    primed: bool,
}

impl Subscription {
    pub fn new(collection: Collection, receiver: watch::Receiver<Arc<Vec<Document>>>) -> Self {
        Self {
            collection,
            receiver,
            primed: false,
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// The most recently published snapshot, without waiting
    pub fn latest(&self) -> Arc<Vec<Document>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next snapshot. The first call returns the current
    /// snapshot immediately; `None` means the store has gone away.
    pub async fn next(&mut self) -> Option<Arc<Vec<Document>>> {
        if !self.primed {
            self.primed = true;
            return Some(self.receiver.borrow_and_update().clone());
        }

        match self.receiver.changed().await {
            Ok(()) => Some(self.receiver.borrow_and_update().clone()),
            Err(_) => None,
        }
    }
}

/// Interface the domain layer requires from the record store
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create a record and return the id the store assigned to it
    async fn create_record(
        &self,
        collection: Collection,
        fields: Fields,
    ) -> Result<String, StoreError>;

    /// Delete a record by id
    async fn delete_record(&self, collection: Collection, id: &str) -> Result<(), StoreError>;

    /// Every record of a collection, newest first
    async fn list_all(&self, collection: Collection) -> Result<Vec<Document>, StoreError>;

    /// Open a live query over a collection ordered by date descending
    fn observe(&self, collection: Collection) -> Result<Subscription, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, date: Option<&str>) -> Document {
        let mut fields = Fields::new();
        if let Some(date) = date {
            fields.insert(DATE_FIELD.to_string(), json!(date));
        }
        Document::new(id, fields)
    }

    #[test]
    fn test_order_by_date_desc() {
        let mut documents = vec![
            doc("a", Some("2025-01-01T00:00:00Z")),
            doc("b", None),
            doc("c", Some("2025-03-01T00:00:00Z")),
            doc("d", Some("2025-02-01T00:00:00+02:00")),
        ];

        order_by_date_desc(&mut documents);

        let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn test_order_ties_break_on_id() {
        let mut documents = vec![
            doc("x1", Some("2025-01-01T00:00:00Z")),
            doc("x3", Some("2025-01-01T00:00:00Z")),
            doc("x2", Some("2025-01-01T00:00:00Z")),
        ];

        order_by_date_desc(&mut documents);

        let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["x3", "x2", "x1"]);
    }

    #[test]
    fn test_document_strips_id_field() {
        let mut fields = Fields::new();
        fields.insert("id".to_string(), json!("spoofed"));
        fields.insert("title".to_string(), json!("Lunch"));

        let document = Document::new("real", fields);

        assert_eq!(document.id, "real");
        assert!(!document.fields.contains_key("id"));
    }

    #[test]
    fn test_collection_names_round_trip() {
        for collection in Collection::ALL {
            assert_eq!(Collection::from_name(collection.name()), Some(collection));
        }
        assert_eq!(Collection::from_name("goals"), None);
    }
}
