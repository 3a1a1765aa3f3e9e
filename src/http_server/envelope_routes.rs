//! Envelope HTTP Routes
//!
//! CRUD over envelopes plus the per-envelope transaction endpoint
//! (deposit / withdraw). Request validation lives here; the store only
//! ever receives already-converted integer cents.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::Envelope;
use crate::money;
use crate::store::{EnvelopePatch, LedgerStore, StoreError};

// ==================
// Request/Response Types
// ==================

/// Envelope as shaped for API responses: balance in major units.
#[derive(Debug, Serialize)]
pub struct EnvelopeDto {
    pub id: u64,
    pub name: String,
    pub balance: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Envelope> for EnvelopeDto {
    fn from(envelope: &Envelope) -> Self {
        Self {
            id: envelope.id,
            name: envelope.name.clone(),
            balance: money::from_cents(envelope.balance_cents),
            created_at: envelope.created_at,
            updated_at: envelope.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EnvelopeListResponse {
    pub data: Vec<EnvelopeDto>,
    pub count: usize,
    #[serde(rename = "totalBalance")]
    pub total_balance: f64,
}

#[derive(Debug, Serialize)]
pub struct EnvelopeResponse {
    pub data: EnvelopeDto,
}

/// Create / full-replace payload. `title` and `budget` are accepted as
/// aliases for `name` and `balance`.
#[derive(Debug, Deserialize)]
pub struct EnvelopeInput {
    #[serde(alias = "title")]
    pub name: String,
    #[serde(alias = "budget")]
    pub balance: f64,
}

/// Partial-update payload; at least one field must be present.
#[derive(Debug, Deserialize)]
pub struct EnvelopePatchInput {
    #[serde(default, alias = "title")]
    pub name: Option<String>,
    #[serde(default, alias = "budget")]
    pub balance: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

pub(crate) type ErrorReply = (StatusCode, Json<ErrorResponse>);

// ==================
// Helper Functions
// ==================

/// Map a store failure onto the transport reply.
pub(crate) fn store_error_reply(err: StoreError) -> ErrorReply {
    let code = err.status_code();
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code,
        }),
    )
}

pub(crate) fn validation_reply(message: &str) -> ErrorReply {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            error: message.to_string(),
            code: 422,
        }),
    )
}

/// Trimmed, non-empty, at most 50 characters.
fn validate_name(name: &str) -> Result<String, ErrorReply> {
    let name = name.trim();
    if name.is_empty() {
        return Err(validation_reply("name must not be empty"));
    }
    if name.chars().count() > 50 {
        return Err(validation_reply("name must be at most 50 characters"));
    }
    Ok(name.to_string())
}

/// Major units to non-negative cents.
fn non_negative_cents(balance: f64) -> Result<i64, ErrorReply> {
    money::to_cents(balance)
        .filter(|cents| *cents >= 0)
        .ok_or_else(|| validation_reply("balance must be a non-negative number"))
}

/// Major units to strictly positive cents.
pub(crate) fn positive_cents(amount: f64) -> Result<i64, ErrorReply> {
    money::to_cents(amount)
        .filter(|cents| *cents > 0)
        .ok_or_else(|| validation_reply("amount must be a positive number"))
}

// ==================
// Envelope Routes
// ==================

/// Create envelope routes
pub fn envelope_routes(store: Arc<LedgerStore>) -> Router {
    Router::new()
        .route(
            "/",
            get(list_envelopes_handler).post(create_envelope_handler),
        )
        .route(
            "/:id",
            get(get_envelope_handler)
                .put(replace_envelope_handler)
                .patch(patch_envelope_handler)
                .delete(delete_envelope_handler),
        )
        .route("/:id/transactions", post(create_transaction_handler))
        .with_state(store)
}

// ==================
// Handlers
// ==================

async fn list_envelopes_handler(
    State(store): State<Arc<LedgerStore>>,
) -> Json<EnvelopeListResponse> {
    let envelopes = store.list().await;
    let data: Vec<EnvelopeDto> = envelopes.iter().map(EnvelopeDto::from).collect();
    let total_balance = money::from_cents(envelopes.iter().map(|e| e.balance_cents).sum());

    Json(EnvelopeListResponse {
        count: data.len(),
        data,
        total_balance,
    })
}

async fn get_envelope_handler(
    State(store): State<Arc<LedgerStore>>,
    Path(id): Path<u64>,
) -> Result<Json<EnvelopeResponse>, ErrorReply> {
    match store.get(id).await {
        Some(envelope) => Ok(Json(EnvelopeResponse {
            data: (&envelope).into(),
        })),
        None => Err(store_error_reply(StoreError::NotFound)),
    }
}

async fn create_envelope_handler(
    State(store): State<Arc<LedgerStore>>,
    Json(input): Json<EnvelopeInput>,
) -> Result<(StatusCode, Json<EnvelopeResponse>), ErrorReply> {
    let name = validate_name(&input.name)?;
    let balance_cents = non_negative_cents(input.balance)?;

    let envelope = store
        .create(name, balance_cents)
        .await
        .map_err(store_error_reply)?;

    Ok((
        StatusCode::CREATED,
        Json(EnvelopeResponse {
            data: (&envelope).into(),
        }),
    ))
}

async fn replace_envelope_handler(
    State(store): State<Arc<LedgerStore>>,
    Path(id): Path<u64>,
    Json(input): Json<EnvelopeInput>,
) -> Result<Json<EnvelopeResponse>, ErrorReply> {
    let patch = EnvelopePatch {
        name: Some(validate_name(&input.name)?),
        balance_cents: Some(non_negative_cents(input.balance)?),
    };

    let envelope = store.update(id, patch).await.map_err(store_error_reply)?;

    Ok(Json(EnvelopeResponse {
        data: (&envelope).into(),
    }))
}

async fn patch_envelope_handler(
    State(store): State<Arc<LedgerStore>>,
    Path(id): Path<u64>,
    Json(input): Json<EnvelopePatchInput>,
) -> Result<Json<EnvelopeResponse>, ErrorReply> {
    if input.name.is_none() && input.balance.is_none() {
        return Err(validation_reply("Provide at least one field to update"));
    }

    let mut patch = EnvelopePatch::default();
    if let Some(name) = &input.name {
        patch.name = Some(validate_name(name)?);
    }
    if let Some(balance) = input.balance {
        patch.balance_cents = Some(non_negative_cents(balance)?);
    }

    let envelope = store.update(id, patch).await.map_err(store_error_reply)?;

    Ok(Json(EnvelopeResponse {
        data: (&envelope).into(),
    }))
}

async fn delete_envelope_handler(
    State(store): State<Arc<LedgerStore>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ErrorReply> {
    store.delete(id).await.map_err(store_error_reply)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_transaction_handler(
    State(store): State<Arc<LedgerStore>>,
    Path(id): Path<u64>,
    Json(request): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<EnvelopeResponse>), ErrorReply> {
    let amount_cents = positive_cents(request.amount)?;

    let envelope = match request.kind {
        TransactionKind::Deposit => store.deposit(id, amount_cents).await,
        TransactionKind::Withdraw => store.withdraw(id, amount_cents).await,
    }
    .map_err(store_error_reply)?;

    Ok((
        StatusCode::CREATED,
        Json(EnvelopeResponse {
            data: (&envelope).into(),
        }),
    ))
}
