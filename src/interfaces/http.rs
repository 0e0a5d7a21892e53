use crate::application::engine::AtmEngine;
use crate::error::AtmError;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Builds the inbound API over a shared engine.
///
/// Each route maps 1:1 to an engine operation; translating engine failures
/// into status codes is the only logic that lives here.
pub fn router(engine: Arc<AtmEngine>) -> Router {
    Router::new()
        .route("/api/account/balance", get(get_balance))
        .route("/api/account/validate", post(validate_account))
        .route("/api/account/withdraw", post(withdraw))
        .with_state(engine)
}

#[derive(Debug, Deserialize)]
struct BalanceQuery {
    account_id: i64,
}

#[derive(Debug, Deserialize)]
struct ValidateRequest {
    account_number: Uuid,
    pin: u16,
}

#[derive(Debug, Deserialize)]
struct WithdrawRequest {
    account_id: i64,
    amount: Decimal,
}

#[derive(Debug, Serialize)]
struct BalanceResponse {
    account_id: i64,
    balance: Decimal,
}

/// Bridges engine failures into HTTP responses.
struct ApiError(AtmError);

impl From<AtmError> for ApiError {
    fn from(err: AtmError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AtmError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AtmError::AccountNotFound => StatusCode::UNAUTHORIZED,
            AtmError::InsufficientCash | AtmError::InsufficientFunds => StatusCode::FORBIDDEN,
            AtmError::SettlementFailure(_)
            | AtmError::NotificationUnavailable
            | AtmError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "message": self.0.to_string() }));
        (status, body).into_response()
    }
}

async fn get_balance(
    State(engine): State<Arc<AtmEngine>>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = engine.get_balance(query.account_id).await?;
    Ok(Json(BalanceResponse {
        account_id: query.account_id,
        balance: balance.0,
    }))
}

async fn validate_account(
    State(engine): State<Arc<AtmEngine>>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let account = engine
        .validate_account(request.account_number, request.pin)
        .await?;
    Ok(Json(BalanceResponse {
        account_id: account.account_id,
        balance: account.withdrawable_balance().0,
    }))
}

async fn withdraw(
    State(engine): State<Arc<AtmEngine>>,
    Json(request): Json<WithdrawRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = engine.withdraw(request.account_id, request.amount).await?;
    Ok(Json(BalanceResponse {
        account_id: request.account_id,
        balance: balance.0,
    }))
}
