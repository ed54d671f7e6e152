//! # Sync Service
//!
//! Owns the in-process copy of both collections and keeps it in step with the
//! record store.
//!
//! The service is created explicitly with the store it talks to and handed to
//! whoever needs it; there is no global instance. [`SyncService::subscribe`]
//! opens one live query per collection and spawns a listener task for each.
//! Every notification replaces the corresponding snapshot wholesale.
//! [`SyncService::dispose`] (or dropping the last handle) stops both listeners.
//!
//! Until a subscription has succeeded there is no snapshot to serve, so every
//! read fails with [`StoreError::Unavailable`] instead of returning empty lists.
//!
//! Writes never touch the local snapshots. A successful write shows up through
//! the live query like any other change. Every write reports failure to its
//! caller as a [`SyncError`].

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, Weak};

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::aggregation::{summarize, AggregationCache, SnapshotRevision, Summary};
use crate::domain::commands::expenses::CreateExpenseCommand;
use crate::domain::commands::savings::CreateSavingCommand;
use crate::domain::models::{Expense, Saving};
use crate::domain::validation::{ValidationError, ValidationService};
use crate::storage::{Collection, Document, RecordStore, StoreError, Subscription};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("reset incomplete: {deleted} savings records deleted, {failed} failed")]
    PartialReset {
        deleted: usize,
        failed: usize,
        #[source]
        first_error: StoreError,
    },
}

/// Result of a stored saving: its id and the message to show the user
#[derive(Debug, Clone, PartialEq)]
pub struct SavingReceipt {
    pub id: String,
    pub success_message: &'static str,
}

#[derive(Default)]
struct LedgerState {
    expenses: Arc<Vec<Expense>>,
    savings: Arc<Vec<Saving>>,
    revision: SnapshotRevision,
    live: bool,
}

struct SyncInner {
    store: Arc<dyn RecordStore>,
    validation: ValidationService,
    state: RwLock<LedgerState>,
    updates: watch::Sender<SnapshotRevision>,
    cache: AggregationCache,
    listeners: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncInner {
    /// Read access to snapshots that have been loaded from the store
    fn live_state(&self) -> Result<RwLockReadGuard<'_, LedgerState>, SyncError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if state.live {
            Ok(state)
        } else {
            let reason = "not subscribed to the record store".to_string();
            Err(StoreError::Unavailable(reason).into())
        }
    }

    fn stop_listeners(&self) -> usize {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let stopped = listeners.len();
        for handle in listeners.drain(..) {
            handle.abort();
        }
        stopped
    }

    /// Replace one snapshot with the typed form of `documents`
    fn replace_snapshot(&self, collection: Collection, documents: &[Document]) {
        let revision = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            match collection {
                Collection::Expenses => {
                    state.expenses = Arc::new(convert_documents(collection, documents));
                    state.revision.expenses += 1;
                }
                Collection::Savings => {
                    state.savings = Arc::new(convert_documents(collection, documents));
                    state.revision.savings += 1;
                }
            }
            state.revision
        };

        debug!(
            "Replaced {} snapshot ({} documents, revision {:?})",
            collection,
            documents.len(),
            revision
        );
        self.updates.send_replace(revision);
    }
}

impl Drop for SyncInner {
    fn drop(&mut self) {
        self.stop_listeners();
    }
}

fn convert_documents<T>(collection: Collection, documents: &[Document]) -> Vec<T>
where
    T: for<'a> TryFrom<&'a Document, Error = crate::domain::models::RecordError>,
{
    documents
        .iter()
        .filter_map(|document| match T::try_from(document) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping {} document {}: {}", collection, document.id, e);
                None
            }
        })
        .collect()
}

/// Handle to the shared ledger state. Clones share the same state.
#[derive(Clone)]
pub struct SyncService {
    inner: Arc<SyncInner>,
}

impl SyncService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let (updates, _) = watch::channel(SnapshotRevision::default());
        Self {
            inner: Arc::new(SyncInner {
                store,
                validation: ValidationService::new(),
                state: RwLock::new(LedgerState::default()),
                updates,
                cache: AggregationCache::new(),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Open live queries on both collections.
    ///
    /// The current contents of both collections are loaded before this
    /// returns. Calling it again replaces the previous listeners.
    pub async fn subscribe(&self) -> Result<(), SyncError> {
        let (mut expenses, mut savings) = match self.open_subscriptions() {
            Ok(subscriptions) => subscriptions,
            Err(e) => {
                error!("Failed to subscribe to the record store: {}", e);
                return Err(e.into());
            }
        };

        let stopped = self.inner.stop_listeners();
        if stopped > 0 {
            debug!("Replacing {} existing listeners", stopped);
        }

        for subscription in [&mut expenses, &mut savings] {
            if let Some(snapshot) = subscription.next().await {
                self.inner.replace_snapshot(subscription.collection(), &snapshot);
            }
        }
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .live = true;

        let weak = Arc::downgrade(&self.inner);
        let handles = vec![
            spawn_listener(weak.clone(), expenses),
            spawn_listener(weak, savings),
        ];
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(handles);

        info!("Subscribed to expenses and savings");
        Ok(())
    }

    fn open_subscriptions(&self) -> Result<(Subscription, Subscription), StoreError> {
        let expenses = self.inner.store.observe(Collection::Expenses)?;
        let savings = self.inner.store.observe(Collection::Savings)?;
        Ok((expenses, savings))
    }

    /// Whether a subscription has loaded the snapshots
    pub fn is_live(&self) -> bool {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).live
    }

    /// Stop both listeners. The last snapshots stay readable.
    pub fn dispose(&self) {
        let stopped = self.inner.stop_listeners();
        info!("Sync service disposed ({} listeners stopped)", stopped);
    }

    pub fn expenses(&self) -> Result<Arc<Vec<Expense>>, SyncError> {
        Ok(Arc::clone(&self.inner.live_state()?.expenses))
    }

    pub fn savings(&self) -> Result<Arc<Vec<Saving>>, SyncError> {
        Ok(Arc::clone(&self.inner.live_state()?.savings))
    }

    pub fn revision(&self) -> SnapshotRevision {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).revision
    }

    /// Changes every time either snapshot is replaced
    pub fn updates(&self) -> watch::Receiver<SnapshotRevision> {
        self.inner.updates.subscribe()
    }

    /// Derived figures for the current snapshots
    pub fn summary(&self) -> Result<Arc<Summary>, SyncError> {
        let (expenses, savings, revision) = {
            let state = self.inner.live_state()?;
            (
                Arc::clone(&state.expenses),
                Arc::clone(&state.savings),
                state.revision,
            )
        };
        Ok(self
            .inner
            .cache
            .get_or_compute(revision, || summarize(&expenses, &savings)))
    }

    /// Validate raw form input and store the expense
    pub async fn submit_expense(
        &self,
        title: &str,
        amount_input: &str,
        category: Option<&str>,
    ) -> Result<String, SyncError> {
        let command = self
            .inner
            .validation
            .validate_expense(title, amount_input, category)
            .map_err(|e| {
                info!("Rejected expense form: {}", e);
                e
            })?;
        self.add_expense(command).await
    }

    pub async fn add_expense(&self, command: CreateExpenseCommand) -> Result<String, SyncError> {
        self.inner.validation.check_expense(&command)?;
        info!("Adding expense '{}' ({})", command.title, command.category);

        let fields = command.to_fields(Utc::now());
        match self.inner.store.create_record(Collection::Expenses, fields).await {
            Ok(id) => {
                info!("Added expense {}", id);
                Ok(id)
            }
            Err(e) => {
                error!("Failed to add expense '{}': {}", command.title, e);
                Err(e.into())
            }
        }
    }

    pub async fn delete_expense(&self, id: &str) -> Result<(), SyncError> {
        info!("Deleting expense {}", id);

        self.inner
            .store
            .delete_record(Collection::Expenses, id)
            .await
            .map_err(|e| {
                error!("Failed to delete expense {}: {}", id, e);
                SyncError::from(e)
            })
    }

    /// Validate the savings form and store the goal or contribution
    pub async fn submit_saving(
        &self,
        title: &str,
        amount_input: &str,
        is_goal: bool,
    ) -> Result<SavingReceipt, SyncError> {
        let command = self
            .inner
            .validation
            .validate_saving(title, amount_input, is_goal)
            .map_err(|e| {
                info!("Rejected savings form: {}", e);
                e
            })?;
        let success_message = command.success_message();
        let id = self.add_saving(command).await?;
        Ok(SavingReceipt {
            id,
            success_message,
        })
    }

    pub async fn add_saving(&self, command: CreateSavingCommand) -> Result<String, SyncError> {
        self.inner.validation.check_saving(&command)?;
        info!(
            "Adding {} '{}' of {:.2}",
            command.saving_type.as_str(),
            command.title,
            command.amount
        );

        let fields = command.to_fields(Utc::now());
        match self.inner.store.create_record(Collection::Savings, fields).await {
            Ok(id) => {
                info!("Added saving {}", id);
                Ok(id)
            }
            Err(e) => {
                error!("Failed to add saving '{}': {}", command.title, e);
                Err(e.into())
            }
        }
    }

    /// Delete every saving record, goals and contributions alike.
    ///
    /// Deletions run concurrently. If any of them fails the others are not
    /// rolled back; the error reports how many went through.
    pub async fn reset_savings(&self) -> Result<usize, SyncError> {
        let documents = self
            .inner
            .store
            .list_all(Collection::Savings)
            .await
            .map_err(|e| {
                error!("Failed to list savings for reset: {}", e);
                SyncError::from(e)
            })?;
        info!("Resetting savings ({} records)", documents.len());

        let store = &self.inner.store;
        let results = join_all(
            documents
                .iter()
                .map(|document| store.delete_record(Collection::Savings, &document.id)),
        )
        .await;

        let mut deleted = 0;
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(()) => deleted += 1,
                Err(e) => failures.push(e),
            }
        }

        let failed = failures.len();
        match failures.into_iter().next() {
            None => {
                info!("Savings reset complete ({} deleted)", deleted);
                Ok(deleted)
            }
            Some(first_error) => {
                error!(
                    "Savings reset incomplete: {} deleted, {} failed ({})",
                    deleted, failed, first_error
                );
                Err(SyncError::PartialReset {
                    deleted,
                    failed,
                    first_error,
                })
            }
        }
    }
}

fn spawn_listener(inner: Weak<SyncInner>, mut subscription: Subscription) -> JoinHandle<()> {
    tokio::spawn(async move {
        let collection = subscription.collection();
        while let Some(snapshot) = subscription.next().await {
            match inner.upgrade() {
                Some(inner) => inner.replace_snapshot(collection, &snapshot),
                None => break,
            }
        }
        debug!("{} listener finished", collection);
    })
}
