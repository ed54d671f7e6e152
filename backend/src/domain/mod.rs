//! # Domain Layer
//!
//! Business logic of the expense tracker, independent of how records are
//! stored or how the screen is drawn.
//!
//! ## Services
//!
//! - **SyncService**: owns the local snapshots of both collections and routes
//!   every write to the record store
//! - **ValidationService**: checks form input before anything is written
//! - **ExpenseTableService**: formats expense rows for display
//!
//! The derived figures (real spending, the category chart, goal progress)
//! live in [`aggregation`] as plain functions over the snapshots.

pub mod aggregation;
pub mod commands;
pub mod expense_table;
pub mod models;
pub mod sync_service;
pub mod validation;

pub use aggregation::{
    AggregationCache, CategoryDistribution, SavingsStats, SnapshotRevision, Summary,
};
pub use expense_table::ExpenseTableService;
pub use sync_service::{SavingReceipt, SyncError, SyncService};
pub use validation::{FormField, ValidationError, ValidationService};
