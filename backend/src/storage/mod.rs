//! # Storage Module
//!
//! Persistence for the two record collections. The domain layer depends only
//! on the [`RecordStore`] trait; this module provides the implementations:
//!
//! - **MemoryStore**: process-local store with live snapshots, used by tests
//!   and when no durable store can be opened
//! - **SqliteStore**: durable store on SQLite via SQLx
//!
//! Every implementation orders collections by `date`, newest first, and
//! publishes full snapshots to live queries after each write.

pub mod memory;
pub mod snapshot;
pub mod sqlite;
pub mod traits;

pub use memory::MemoryStore;
pub use snapshot::SnapshotPublisher;
pub use sqlite::SqliteStore;
pub use traits::{
    order_by_date_desc, Collection, Document, Fields, RecordStore, StoreError, Subscription,
    DATE_FIELD,
};
