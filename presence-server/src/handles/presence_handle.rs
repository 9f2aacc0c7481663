use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use presence_api::models::{PresenceMap, ReportForm};

use crate::errors::ApiError;
use crate::middlewares::BasicCredentials;
use crate::services::{PresenceOutcome, PresenceRequest, PresenceService};

#[derive(Clone)]
pub struct PresenceState {
    pub presence_service: Arc<PresenceService>,
}

pub fn presence_router(presence_state: PresenceState) -> Router {
    Router::new()
        .route("/api/geofence", get(list_presence).post(report_presence))
        .with_state(presence_state)
}

#[utoipa::path(
    post,
    path = "/api/geofence",
    tag = "presence",
    request_body(content = ReportForm, content_type = "application/x-www-form-urlencoded"),
    security(
        (),
        ("basic_auth" = [])
    ),
    responses(
        (status = 200, description = "Trusted device recorded (empty body), or the full presence map for an authenticated caller", body = PresenceMap),
        (status = 403, description = "Not authorized", body = String),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn report_presence(
    State(state): State<PresenceState>,
    BasicCredentials(credentials): BasicCredentials,
    form: Option<Form<ReportForm>>,
) -> Result<Response, ApiError> {
    let form = form.map(|Form(form)| form).unwrap_or_default();

    let outcome = state
        .presence_service
        .handle(PresenceRequest {
            device_id: form.device_id,
            action: form.action,
            credentials,
        })
        .await?;

    Ok(into_response(outcome))
}

#[utoipa::path(
    get,
    path = "/api/geofence",
    tag = "presence",
    security(
        ("basic_auth" = [])
    ),
    responses(
        (status = 200, description = "Every device's last action", body = PresenceMap),
        (status = 403, description = "Not authorized", body = String),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_presence(
    State(state): State<PresenceState>,
    BasicCredentials(credentials): BasicCredentials,
) -> Result<Response, ApiError> {
    let outcome = state
        .presence_service
        .handle(PresenceRequest {
            credentials,
            ..Default::default()
        })
        .await?;

    Ok(into_response(outcome))
}

fn into_response(outcome: PresenceOutcome) -> Response {
    match outcome {
        PresenceOutcome::Recorded(_) => StatusCode::OK.into_response(),
        PresenceOutcome::Listing(presence) => Json(presence).into_response(),
    }
}
