//! # REST API for Savings
//!
//! Endpoints for listing savings records, setting goals, adding contributions
//! and resetting the savings collection.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{CreateSavingRequest, CreateSavingResponse, ResetSavingsResponse};
use tracing::{error, info};

use crate::io::rest::error_response;
use crate::io::rest::mappers::SavingMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/savings", get(list_savings).post(create_saving))
        .route("/api/savings/reset", post(reset_savings))
}

pub async fn list_savings(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/savings");

    match state.sync_service.savings() {
        Ok(savings) => (StatusCode::OK, Json(SavingMapper::to_dto_list(&savings))).into_response(),
        Err(e) => {
            error!("Failed to list savings: {}", e);
            error_response(&e)
        }
    }
}

/// Set a new goal or add a contribution
pub async fn create_saving(
    State(state): State<AppState>,
    Json(request): Json<CreateSavingRequest>,
) -> impl IntoResponse {
    info!("POST /api/savings - request: {:?}", request);

    match state
        .sync_service
        .submit_saving(&request.title, &request.amount, request.is_goal)
        .await
    {
        Ok(receipt) => {
            let response = CreateSavingResponse {
                id: receipt.id,
                success_message: receipt.success_message.to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to create saving: {}", e);
            error_response(&e)
        }
    }
}

pub async fn reset_savings(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/savings/reset");

    match state.sync_service.reset_savings().await {
        Ok(deleted_count) => {
            let response = ResetSavingsResponse { deleted_count };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to reset savings: {}", e);
            error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{subscribed_state, wait_until};
    use axum::{
        body::Body,
        http::{Method, Request},
    };
    use serde_json::json;
    use shared::{ErrorResponse, Saving, SavingType};
    use tower::util::ServiceExt; // for `oneshot`

    fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_set_goal_and_contribute() {
        let (_store, state) = subscribed_state().await;
        let app = router().with_state(state.clone());

        let response = app
            .clone()
            .oneshot(post(
                "/api/savings",
                json!({ "title": "Phone", "amount": "100", "is_goal": true }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let created: CreateSavingResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.success_message, "New goal set!");

        let response = app
            .clone()
            .oneshot(post(
                "/api/savings",
                json!({ "title": "Jar", "amount": "40", "is_goal": false }),
            ))
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let created: CreateSavingResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.success_message, "Savings updated!");

        wait_until(&state.sync_service, |s| s.savings().unwrap().len() == 2).await;

        let request = Request::builder().uri("/api/savings").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let savings: Vec<Saving> = serde_json::from_slice(&body).unwrap();
        assert_eq!(savings.len(), 2);
        assert!(savings.iter().any(|s| s.saving_type == SavingType::Goal));
    }

    #[tokio::test]
    async fn test_create_saving_missing_title() {
        let (_store, state) = subscribed_state().await;
        let app = router().with_state(state);

        let response = app
            .oneshot(post(
                "/api/savings",
                json!({ "title": " ", "amount": "10", "is_goal": false }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error.error.starts_with("Please fill in all fields"));
    }

    #[tokio::test]
    async fn test_reset_savings() {
        let (_store, state) = subscribed_state().await;
        state.sync_service.submit_saving("Phone", "100", true).await.unwrap();
        state.sync_service.submit_saving("Jar", "5", false).await.unwrap();
        let app = router().with_state(state);

        let response = app.oneshot(post("/api/savings/reset", json!({}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let reset: ResetSavingsResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(reset.deleted_count, 2);
    }
}
