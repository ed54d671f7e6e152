//! # REST API for the Spending Summary

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::{error, info};

use crate::io::rest::error_response;
use crate::io::rest::mappers::SummaryMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/summary", get(get_summary))
}

/// Real spending, the category chart and goal progress
pub async fn get_summary(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/summary");

    match state.sync_service.summary() {
        Ok(summary) => {
            let response = SummaryMapper::to_dto(&summary, &state.expense_table_service);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to build summary: {}", e);
            error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{subscribed_state, wait_until};
    use axum::{body::Body, http::Request};
    use shared::SpendingSummary;
    use tower::util::ServiceExt; // for `oneshot`

    async fn fetch_summary(app: Router) -> SpendingSummary {
        let request = Request::builder().uri("/api/summary").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_empty_summary() {
        let (_store, state) = subscribed_state().await;

        let summary = fetch_summary(router().with_state(state)).await;
        assert_eq!(summary.real_spending_total, 0.0);
        assert!(summary.chart.is_none());
        assert!(!summary.savings.has_goal);
        assert_eq!(summary.savings.active_goal, "No Goal Set");
    }

    #[tokio::test]
    async fn test_summary_reflects_records() {
        let (_store, state) = subscribed_state().await;
        let sync = &state.sync_service;
        sync.submit_expense("Groceries", "20", Some("Food")).await.unwrap();
        sync.submit_expense("To savings", "10", Some("Savings")).await.unwrap();
        sync.submit_saving("Phone", "100", true).await.unwrap();
        sync.submit_saving("Jar", "40", false).await.unwrap();
        wait_until(sync, |s| {
            s.expenses().unwrap().len() == 2 && s.savings().unwrap().len() == 2
        })
        .await;

        let summary = fetch_summary(router().with_state(state.clone())).await;
        assert_eq!(summary.real_spending_total, 20.0);
        assert_eq!(summary.formatted_real_spending, "$20.00");
        assert_eq!(summary.chart.map(|bars| bars.len()), Some(2));
        assert_eq!(summary.savings.total_saved, 50.0);
        assert_eq!(summary.savings.remaining, 50.0);
        assert_eq!(summary.savings.progress_label, "50% Complete");
    }
}
