use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use presence_api::models::{DeviceRecord, PresenceMap, ReportForm};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::configs::{Settings, Storage};
use crate::errors::StorageError;
use crate::handles::*;
use crate::services::{CredentialService, PresenceService};

#[derive(OpenApi)]
#[openapi(
    paths(report_presence, list_presence),
    components(schemas(DeviceRecord, PresenceMap, ReportForm)),
    modifiers(&BasicAuthScheme),
    tags((name = "presence", description = "Last reported action of every geofenced device"))
)]
pub struct ApiDoc;

struct BasicAuthScheme;

impl Modify for BasicAuthScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            );
        }
    }
}

pub async fn create_app(settings: &Arc<Settings>) -> Result<Router, StorageError> {
    let storage = Arc::new(Storage::new(settings.store.clone()).await?);
    let credential_service = Arc::new(CredentialService::new(settings.auth.credentials.clone()));
    let presence_service = Arc::new(PresenceService::new(
        storage,
        credential_service,
        settings.devices.clone(),
    ));

    Ok(Router::new()
        .merge(presence_router(PresenceState { presence_service }))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()))
}
