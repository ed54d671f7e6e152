//! # Expense Tracker Backend
//!
//! Personal expense and savings tracking over a document record store.
//!
//! ## Architecture Overview
//!
//! - **Storage Layer** ([`storage`]): the [`storage::RecordStore`] interface with
//!   in-memory and SQLite implementations, both serving live snapshots
//! - **Domain Layer** ([`domain`]): the sync service holding the local
//!   snapshots, form validation and the derived spending and savings figures
//! - **IO Layer** ([`io`]): REST endpoints over the domain services
//!
//! [`initialize_backend`] wires the layers together from an [`AppConfig`];
//! [`create_router`] builds the HTTP application around the result.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_utils;

use std::sync::Arc;

use anyhow::{bail, Result};
use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub use config::AppConfig;
use domain::{ExpenseTableService, SyncService};
use storage::{MemoryStore, RecordStore, SqliteStore};

/// Services shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub sync_service: SyncService,
    pub expense_table_service: ExpenseTableService,
}

/// Open the configured record store.
///
/// A store that cannot be reached is replaced by an offline store so the
/// application still starts; reads and writes then fail where they happen.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn RecordStore>> {
    if config.uses_memory_store() {
        info!("Using in-memory record store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    if !config.database_url.starts_with("sqlite:") {
        bail!("unsupported database url '{}'", config.database_url);
    }

    match SqliteStore::new(&config.database_url).await {
        Ok(store) => Ok(Arc::new(store)),
        Err(e) => {
            warn!(
                "Record store at {} is unreachable ({}); continuing offline",
                config.database_url, e
            );
            Ok(Arc::new(MemoryStore::unavailable()))
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    config.check_credentials();

    info!("Setting up record store");
    let store = open_store(config).await?;

    info!("Setting up domain services");
    let sync_service = SyncService::new(store);
    if let Err(e) = sync_service.subscribe().await {
        warn!("Could not subscribe to the record store, reads will fail: {}", e);
    }

    Ok(AppState {
        sync_service,
        expense_table_service: ExpenseTableService::new(),
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(io::health_check))
        .merge(io::expense_apis::router())
        .merge(io::saving_apis::router())
        .merge(io::summary_apis::router())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::subscribed_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::collections::HashMap;
    use tower::util::ServiceExt; // for `oneshot`

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::load_with(|key: &str| vars.get(key).cloned()).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_routes() {
        let (_store, state) = subscribed_state().await;
        let app = create_router(state);

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"OK");

        for uri in ["/api/expenses", "/api/savings", "/api/summary"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        }
    }

    #[tokio::test]
    async fn test_initialize_with_memory_store() {
        let state = initialize_backend(&config(&[("EXPENSE_TRACKER_DATABASE_URL", "memory")]))
            .await
            .unwrap();

        let id = state
            .sync_service
            .submit_expense("Coffee", "3.20", Some("Food"))
            .await
            .unwrap();
        assert!(!id.is_empty());
    }

    #[tokio::test]
    async fn test_initialize_with_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("tracker.db").display());
        let state = initialize_backend(&config(&[("EXPENSE_TRACKER_DATABASE_URL", url.as_str())]))
            .await
            .unwrap();

        state.sync_service.submit_saving("Bike", "250", true).await.unwrap();
        crate::test_utils::wait_until(&state.sync_service, |s| s.savings().unwrap().len() == 1)
            .await;
        assert!(state.sync_service.summary().unwrap().savings.has_goal);
    }

    #[tokio::test]
    async fn test_unreachable_store_fails_reads() {
        let url = "sqlite:/nonexistent_dir_for_tracker/a/b.db";
        let state = initialize_backend(&config(&[("EXPENSE_TRACKER_DATABASE_URL", url)]))
            .await
            .unwrap();
        assert!(!state.sync_service.is_live());
        let app = create_router(state);

        for uri in ["/api/expenses", "/api/savings", "/api/summary"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "GET {}", uri);
        }
    }

    #[tokio::test]
    async fn test_unsupported_database_url() {
        let config = config(&[("EXPENSE_TRACKER_DATABASE_URL", "postgres://db")]);
        assert!(open_store(&config).await.is_err());
    }
}
