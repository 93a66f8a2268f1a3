//! Account registration, login, and user administration

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::naming;
use crate::provisioner::ensure_namespace;
use crate::server::{ApiError, AppState};
use crate::store::auth::{generate_token, LoginRequest, RegisterRequest};
use crate::store::{authenticate, AuthUser};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    req.validate()
        .map_err(|msg| ApiError::new(StatusCode::BAD_REQUEST, msg))?;
    let store = state.store.as_ref().ok_or_else(ApiError::store_unavailable)?;

    let user = store.register_user(&req).await?;

    // The tenant namespace is created eagerly so the first provisioning
    // request does not pay for it. Failure here is not fatal; provisioning
    // ensures the namespace again.
    let namespace = naming::derive_namespace(user.id, &user.username);
    if let Err(err) = ensure_namespace(&state.ctx, &namespace).await {
        warn!(namespace = %namespace, error = %err, "eager namespace creation failed");
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": user, "token": generate_token(user.id) })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = state.store.as_ref().ok_or_else(ApiError::store_unavailable)?;

    let Some((user, hash)) = store.user_with_hash(&req.username).await? else {
        return Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "invalid username or password",
        ));
    };
    if !authenticate(&req.password, &hash) {
        return Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "invalid username or password",
        ));
    }

    Ok(Json(json!({ "user": user, "token": generate_token(user.id) })))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<AuthUser>>, ApiError> {
    let store = state.store.as_ref().ok_or_else(ApiError::store_unavailable)?;
    Ok(Json(store.get_all_users().await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AuthUser>, ApiError> {
    let store = state.store.as_ref().ok_or_else(ApiError::store_unavailable)?;
    Ok(Json(store.get_user(id).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = state.store.as_ref().ok_or_else(ApiError::store_unavailable)?;
    store.delete_user(id).await?;
    Ok(Json(json!({ "message": format!("user {} deleted", id) })))
}
