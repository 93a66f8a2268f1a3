//! Database provisioning endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::model::{DatabaseResponse, DatabaseSummary, NamespaceSummary, ProvisionRequest};
use crate::provisioner;
use crate::server::{ApiError, AppState};
use crate::store::DatabaseRecord;

pub async fn create_database(
    State(state): State<AppState>,
    Json(req): Json<ProvisionRequest>,
) -> Result<(StatusCode, Json<DatabaseResponse>), ApiError> {
    let response = provisioner::provision(&state.ctx, &req).await?;

    // Bookkeeping only; the cluster is the source of truth, so a dead
    // control database must not fail a provision that already happened.
    if let Some(store) = &state.store {
        if let Err(err) = store.record_database(&response, req.user_id).await {
            warn!(database = %response.name, error = %err, "database record insert failed");
        }
    }

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn delete_database(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    provisioner::decommission(&state.ctx, &namespace, &name).await?;

    if let Some(store) = &state.store {
        if let Err(err) = store.delete_database_record(&name, &namespace).await {
            warn!(database = %name, error = %err, "database record delete failed");
        }
    }

    Ok(Json(json!({
        "message": format!("database {} deleted from namespace {}", name, namespace)
    })))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

pub async fn update_database_status(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = state.store.as_ref().ok_or_else(ApiError::store_unavailable)?;
    store
        .update_database_status(&name, &namespace, &update.status)
        .await?;
    Ok(Json(json!({
        "message": format!("database {} marked {}", name, update.status)
    })))
}

pub async fn list_user_databases(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<DatabaseRecord>>, ApiError> {
    let store = state.store.as_ref().ok_or_else(ApiError::store_unavailable)?;
    Ok(Json(store.user_databases(id).await?))
}

pub async fn list_databases(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<Json<Vec<DatabaseSummary>>, ApiError> {
    let databases = provisioner::list_databases(&state.ctx, &namespace).await?;
    Ok(Json(databases))
}

pub async fn list_namespaces(
    State(state): State<AppState>,
) -> Result<Json<Vec<NamespaceSummary>>, ApiError> {
    let namespaces = provisioner::list_namespaces(&state.ctx).await?;
    Ok(Json(namespaces))
}
