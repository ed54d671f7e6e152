//! Helpers shared by the unit tests.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ExpenseTableService, SyncService};
use crate::storage::MemoryStore;
use crate::AppState;

/// Wait until the snapshots held by `service` satisfy `condition`
pub async fn wait_until<F>(service: &SyncService, condition: F)
where
    F: Fn(&SyncService) -> bool,
{
    let mut updates = service.updates();
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition(service) {
            updates.changed().await.unwrap();
        }
    })
    .await
    .expect("snapshot did not reach the expected state");
}

/// Application state over a fresh in-memory store, already subscribed
pub async fn subscribed_state() -> (MemoryStore, AppState) {
    let store = MemoryStore::new();
    let sync_service = SyncService::new(Arc::new(store.clone()));
    sync_service.subscribe().await.unwrap();

    let state = AppState {
        sync_service,
        expense_table_service: ExpenseTableService::new(),
    };
    (store, state)
}
