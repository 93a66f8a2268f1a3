//! HTTP API surface
//!
//! Thin axum handlers over the provisioner and the store. Handlers do no
//! orchestration of their own; they translate requests and map the error
//! taxonomy onto status codes.

mod auth;
mod databases;
mod pods;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::health::HealthState;
use crate::provisioner::{Context, Error};
use crate::store::{Store, StoreError};

#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<Context>,
    /// Absent when the control database was unreachable at startup.
    pub store: Option<Arc<Store>>,
    pub health: HealthState,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/api/databases", post(databases::create_database))
        .route("/api/databases/{namespace}", get(databases::list_databases))
        .route(
            "/api/databases/{namespace}/{name}",
            delete(databases::delete_database),
        )
        .route(
            "/api/databases/{namespace}/{name}/status",
            put(databases::update_database_status),
        )
        .route("/api/namespaces", get(databases::list_namespaces))
        .route(
            "/api/users/{id}/databases",
            get(databases::list_user_databases),
        )
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/users", get(auth::list_users))
        .route("/api/users/{id}", get(auth::get_user).delete(auth::delete_user))
        .route("/api/pods", get(pods::list_pods))
        .route("/api/pods/{namespace}/{name}", get(pods::get_pod))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn readyz(State(state): State<AppState>) -> Response {
    if state.health.is_ready() {
        (StatusCode::OK, "ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
    }
}

/// An error already shaped for the wire.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn store_unavailable() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "control database is unavailable",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = if err.is_invalid() {
            StatusCode::BAD_REQUEST
        } else if err.is_conflict() {
            StatusCode::CONFLICT
        } else if err.is_not_found() {
            StatusCode::NOT_FOUND
        } else if matches!(err, Error::RoutingUnavailable) {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(status, err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match err {
            StoreError::UsernameTaken(_) => StatusCode::CONFLICT,
            StoreError::UserNotFound(_) | StoreError::DatabaseRecordNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            StoreError::Postgres(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provisioner::ProvisionStep;

    #[test]
    fn test_error_status_mapping() {
        let invalid = ApiError::from(Error::InvalidRequest("bad name".to_string()));
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

        let conflict = ApiError::from(
            Error::ResourceConflict {
                kind: "Deployment",
                name: "orders-db".to_string(),
                namespace: "7alice".to_string(),
            }
            .at_step(ProvisionStep::CreateDatabaseWorkload, "orders-db", "7alice"),
        );
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let not_found = ApiError::from(Error::ResourceNotFound {
            kind: "Deployment",
            name: "orders-db".to_string(),
            namespace: "7alice".to_string(),
        });
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);

        let routing = ApiError::from(Error::RoutingUnavailable);
        assert_eq!(routing.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_store_error_status_mapping() {
        let taken = ApiError::from(StoreError::UsernameTaken("alice".to_string()));
        assert_eq!(taken.status, StatusCode::CONFLICT);
        let missing = ApiError::from(StoreError::UserNotFound(9));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        let missing_record = ApiError::from(StoreError::DatabaseRecordNotFound {
            name: "orders-db".to_string(),
            namespace: "7alice".to_string(),
        });
        assert_eq!(missing_record.status, StatusCode::NOT_FOUND);
    }
}
