//! Read-only pod observability endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use k8s_openapi::api::core::v1::Pod;
use kube::api::ListParams;
use serde::Serialize;

use crate::provisioner::error::is_api_status;
use crate::provisioner::Error;
use crate::server::{ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSummary {
    pub name: String,
    pub namespace: String,
    pub status: String,
    /// Ready containers over total, e.g. "1/1".
    pub ready: String,
    pub restarts: i32,
    pub age: String,
    pub node: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodDetail {
    #[serde(flatten)]
    pub summary: PodSummary,
    pub pod_ip: Option<String>,
    pub containers: Vec<ContainerInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInfo {
    pub name: String,
    pub image: Option<String>,
    pub ready: bool,
    pub restart_count: i32,
}

pub async fn list_pods(State(state): State<AppState>) -> Result<Json<Vec<PodSummary>>, ApiError> {
    let pods = state
        .ctx
        .all_pods()
        .list(&ListParams::default())
        .await
        .map_err(Error::Kube)?;
    Ok(Json(pods.items.iter().map(summarize).collect()))
}

pub async fn get_pod(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
) -> Result<Json<PodDetail>, ApiError> {
    let pod = state.ctx.pods(&namespace).get(&name).await.map_err(|err| {
        if is_api_status(&err, 404) {
            ApiError::new(
                StatusCode::NOT_FOUND,
                format!("pod {} not found in namespace {}", name, namespace),
            )
        } else {
            ApiError::from(Error::Kube(err))
        }
    })?;

    let statuses = pod
        .status
        .as_ref()
        .and_then(|s| s.container_statuses.clone())
        .unwrap_or_default();
    let containers = pod
        .spec
        .as_ref()
        .map(|spec| {
            spec.containers
                .iter()
                .map(|c| {
                    let status = statuses.iter().find(|s| s.name == c.name);
                    ContainerInfo {
                        name: c.name.clone(),
                        image: c.image.clone(),
                        ready: status.map(|s| s.ready).unwrap_or(false),
                        restart_count: status.map(|s| s.restart_count).unwrap_or(0),
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Json(PodDetail {
        pod_ip: pod.status.as_ref().and_then(|s| s.pod_ip.clone()),
        summary: summarize(&pod),
        containers,
    }))
}

fn summarize(pod: &Pod) -> PodSummary {
    let statuses = pod
        .status
        .as_ref()
        .and_then(|s| s.container_statuses.as_ref());
    let total = pod.spec.as_ref().map(|s| s.containers.len()).unwrap_or(0);
    let ready = statuses
        .map(|s| s.iter().filter(|c| c.ready).count())
        .unwrap_or(0);
    let restarts = statuses
        .map(|s| s.iter().map(|c| c.restart_count).sum())
        .unwrap_or(0);

    PodSummary {
        name: pod.metadata.name.clone().unwrap_or_default(),
        namespace: pod.metadata.namespace.clone().unwrap_or_default(),
        status: pod
            .status
            .as_ref()
            .and_then(|s| s.phase.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        ready: format!("{}/{}", ready, total),
        restarts,
        age: pod
            .metadata
            .creation_timestamp
            .as_ref()
            .map(|t| format_age(t.0))
            .unwrap_or_else(|| "unknown".to_string()),
        node: pod.spec.as_ref().and_then(|s| s.node_name.clone()),
    }
}

/// Shorten a pod age the way kubectl does: largest unit only.
fn format_age(created: chrono::DateTime<Utc>) -> String {
    let elapsed = Utc::now().signed_duration_since(created);
    if elapsed.num_days() > 0 {
        format!("{}d", elapsed.num_days())
    } else if elapsed.num_hours() > 0 {
        format!("{}h", elapsed.num_hours())
    } else if elapsed.num_minutes() > 0 {
        format!("{}m", elapsed.num_minutes())
    } else {
        format!("{}s", elapsed.num_seconds().max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_age_units() {
        let now = Utc::now();
        assert_eq!(format_age(now - Duration::days(3)), "3d");
        assert_eq!(format_age(now - Duration::hours(5)), "5h");
        assert_eq!(format_age(now - Duration::minutes(12)), "12m");
        assert_eq!(format_age(now - Duration::seconds(30)), "30s");
    }

    #[test]
    fn test_summarize_defaults_for_sparse_pod() {
        let pod = Pod::default();
        let summary = summarize(&pod);
        assert_eq!(summary.status, "Unknown");
        assert_eq!(summary.ready, "0/0");
        assert_eq!(summary.restarts, 0);
        assert_eq!(summary.age, "unknown");
    }
}
