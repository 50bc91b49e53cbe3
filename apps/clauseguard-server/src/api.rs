//! API handlers for the ClauseGuard server
//!
//! Provides REST endpoints for:
//! - Document risk analysis (multipart upload)
//! - Identity sync passthrough for the dashboard
//! - Health checks

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use shared_types::AnalysisReport;

use crate::error::ServerError;
use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ready",
        service: "clauseguard-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: POST /analyze_document
///
/// Multipart form body: `file` (PDF or plain text, required) and
/// `user_rule` (free text, optional). Returns the per-clause risk report.
pub async fn handle_analyze_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, ServerError> {
    let mut upload: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut user_rule: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ServerError::InvalidRequest(format!("Malformed multipart body: {}", e))
    })? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    ServerError::InvalidRequest(format!("Could not read file field: {}", e))
                })?;
                upload = Some((filename, content_type, data.to_vec()));
            }
            Some("user_rule") => {
                let text = field.text().await.map_err(|e| {
                    ServerError::InvalidRequest(format!("Could not read user_rule field: {}", e))
                })?;
                user_rule = Some(text);
            }
            other => {
                debug!(field = ?other, "ignoring unexpected multipart field");
            }
        }
    }

    let (filename, content_type, data) = upload
        .ok_or_else(|| ServerError::InvalidRequest("Missing 'file' field".to_string()))?;
    info!(%filename, size = data.len(), "received document for analysis");

    // Untouched rule inputs arrive as empty strings; treat them as absent.
    let rule = user_rule
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    let report = state
        .engine
        .analyze(&filename, content_type.as_deref(), &data, rule)
        .await?;

    Ok(Json(report))
}

/// Identity sync payload forwarded by the dashboard.
#[derive(Debug, Deserialize)]
pub struct UserSyncRequest {
    pub clerk_id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Sync acknowledgment
#[derive(Serialize)]
pub struct UserSyncResponse {
    pub status: &'static str,
    pub updated: bool,
}

/// Handler: POST /users/sync
///
/// Pure passthrough: the dashboard expects an acknowledgment, but user
/// persistence is outside this service's scope.
pub async fn handle_user_sync(
    Json(user): Json<UserSyncRequest>,
) -> Json<UserSyncResponse> {
    info!(
        clerk_id = %user.clerk_id,
        email = %user.email,
        name = ?user.name,
        "user sync acknowledged"
    );
    Json(UserSyncResponse {
        status: "synced",
        updated: true,
    })
}
