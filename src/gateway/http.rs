//! HTTP transport for a [`LocalGateway`].
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /evaluate/:function` - run a transaction without committing. Body
//!   is a JSON array of string arguments.
//! - `POST /submit/:function` - run and commit.
//! - `GET /health` - `{ "ok": true, "channel": ..., "chaincode": ..., "transactions": [...] }`.
//!
//! A successful call answers 200 with the transaction's bytes. Failures
//! answer `{ "error": ..., "kind": ... }` with the error's status code.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::state::WorldState;

use super::{Gateway, GatewayError, LocalGateway};

/// Build an axum `Router` over the given gateway.
pub fn router<W: WorldState + 'static>(gateway: Arc<LocalGateway<W>>) -> Router {
    Router::new()
        .route("/health", get(health_handler::<W>))
        .route("/evaluate/:function", post(evaluate_handler::<W>))
        .route("/submit/:function", post(submit_handler::<W>))
        .with_state(gateway)
}

/// Serve the gateway over HTTP at the given address (e.g. `"127.0.0.1:7052"`).
pub async fn serve<W: WorldState + 'static>(
    gateway: Arc<LocalGateway<W>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(gateway);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = addr, "serving contract over http");
    axum::serve(listener, app).await
}

async fn health_handler<W: WorldState + 'static>(
    State(gateway): State<Arc<LocalGateway<W>>>,
) -> impl IntoResponse {
    let config = gateway.config();
    Json(json!({
        "ok": true,
        "channel": config.channel_name,
        "chaincode": config.chaincode_name,
        "transactions": gateway.contract().transactions(),
    }))
}

async fn evaluate_handler<W: WorldState + 'static>(
    State(gateway): State<Arc<LocalGateway<W>>>,
    Path(function): Path<String>,
    Json(args): Json<Vec<String>>,
) -> Response {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    respond(gateway.evaluate_transaction(&function, &args))
}

async fn submit_handler<W: WorldState + 'static>(
    State(gateway): State<Arc<LocalGateway<W>>>,
    Path(function): Path<String>,
    Json(args): Json<Vec<String>>,
) -> Response {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    respond(gateway.submit_transaction(&function, &args))
}

fn respond(result: Result<Vec<u8>, GatewayError>) -> Response {
    match result {
        Ok(payload) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            payload,
        )
            .into_response(),
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = json!({ "error": e.to_string(), "kind": e.kind().to_string() });
            (status, Json(body)).into_response()
        }
    }
}
