//! # REST API for Expenses
//!
//! Endpoints for listing, creating and deleting expenses.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use shared::{CreateExpenseRequest, CreateExpenseResponse};
use tracing::{error, info};

use crate::io::rest::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/expenses", get(list_expenses).post(create_expense))
        .route("/api/expenses/:id", delete(delete_expense))
}

/// Formatted expense rows, newest first
pub async fn list_expenses(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/expenses");

    match state.sync_service.expenses() {
        Ok(expenses) => {
            let rows = state.expense_table_service.format_expenses(&expenses);
            (StatusCode::OK, Json(rows)).into_response()
        }
        Err(e) => {
            error!("Failed to list expenses: {}", e);
            error_response(&e)
        }
    }
}

pub async fn create_expense(
    State(state): State<AppState>,
    Json(request): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    info!("POST /api/expenses - request: {:?}", request);

    match state
        .sync_service
        .submit_expense(&request.title, &request.amount, request.category.as_deref())
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(CreateExpenseResponse { id })).into_response(),
        Err(e) => {
            error!("Failed to create expense: {}", e);
            error_response(&e)
        }
    }
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/expenses/{}", id);

    match state.sync_service.delete_expense(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete expense {}: {}", id, e);
            error_response(&e)
        }
    }
}
