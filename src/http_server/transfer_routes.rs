//! Transfer HTTP Routes
//!
//! A single endpoint moving money between two envelopes.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::money;
use crate::store::LedgerStore;

use super::envelope_routes::{positive_cents, store_error_reply, EnvelopeDto, ErrorReply};

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    #[serde(rename = "fromId")]
    pub from_id: u64,
    #[serde(rename = "toId")]
    pub to_id: u64,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct TransferBody {
    pub from: EnvelopeDto,
    pub to: EnvelopeDto,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub data: TransferBody,
}

// ==================
// Transfer Routes
// ==================

/// Create transfer routes
pub fn transfer_routes(store: Arc<LedgerStore>) -> Router {
    Router::new()
        .route("/", post(create_transfer_handler))
        .with_state(store)
}

async fn create_transfer_handler(
    State(store): State<Arc<LedgerStore>>,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<TransferResponse>), ErrorReply> {
    let amount_cents = positive_cents(request.amount)?;

    let outcome = store
        .transfer(request.from_id, request.to_id, amount_cents)
        .await
        .map_err(store_error_reply)?;

    Ok((
        StatusCode::CREATED,
        Json(TransferResponse {
            data: TransferBody {
                from: (&outcome.from).into(),
                to: (&outcome.to).into(),
                amount: money::from_cents(amount_cents),
            },
        }),
    ))
}
