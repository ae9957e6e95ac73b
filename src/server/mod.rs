//! On-demand trigger endpoints.
//!
//! Thin HTTP surface over the pass services: each route synchronously
//! runs one full pass for its cadence and reports the outcome.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::post;
use log::error;
use log::info;
use serde_json::json;

use crate::service::Services;
use crate::service::alert_service::PassSummary;
use crate::service::cadence::Cadence;
use crate::service::error::ServiceError;

#[derive(Clone)]
struct ServerState {
    services: Arc<Services>,
}

pub fn make_app(services: Arc<Services>) -> Router {
    let state = ServerState { services };

    Router::new()
        .route("/notifications/daily", post(trigger_daily))
        .route("/notifications/weekly", post(trigger_weekly))
        .route("/notifications/monthly", post(trigger_monthly))
        .with_state(state)
}

pub async fn run_server(services: Arc<Services>, port: u16) -> anyhow::Result<()> {
    let app = make_app(services);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!("Trigger endpoints listening on port {port}.");
    Ok(axum::serve(listener, app).await?)
}

async fn trigger_daily(State(state): State<ServerState>) -> Response {
    respond(state.services.alert.run_pass(Cadence::Daily).await)
}

async fn trigger_weekly(State(state): State<ServerState>) -> Response {
    respond(state.services.digest.run_pass(Cadence::Weekly).await)
}

async fn trigger_monthly(State(state): State<ServerState>) -> Response {
    respond(state.services.digest.run_pass(Cadence::Monthly).await)
}

fn respond(result: Result<PassSummary, ServiceError>) -> Response {
    match result {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({ "message": summary.to_string() })),
        )
            .into_response(),
        Err(e) => {
            error!("Triggered pass failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
