//! Listing provisioned databases and tenant namespaces
//!
//! Listing is label driven. Database workloads are found by the managed-by
//! plus component selector, and everything reported about them is
//! reconstructed from labels with the same formulas used at creation time.
//! Nothing is read back from annotations or persisted state, so the lister
//! and the provisioner cannot disagree about a URL.

use kube::api::ListParams;
use tracing::{instrument, warn};

use crate::model::{DatabaseSummary, NamespaceSummary};
use crate::naming;
use crate::policy::DatabaseType;
use crate::provisioner::context::Context;
use crate::provisioner::error::{is_api_status, Result};
use crate::resources::common::{DATABASE_SELECTOR, TYPE_LABEL, USER_ID_LABEL, USER_NAMESPACE_SELECTOR};

/// List the provisioned databases in one tenant namespace.
#[instrument(skip(ctx))]
pub async fn list_databases(ctx: &Context, namespace: &str) -> Result<Vec<DatabaseSummary>> {
    let deployments = ctx.deployments(namespace);
    let services = ctx.services(namespace);
    let params = ListParams::default().labels(DATABASE_SELECTOR);

    let mut summaries = Vec::new();
    for workload in deployments.list(&params).await? {
        let Some(name) = workload.metadata.name.clone() else {
            continue;
        };
        let labels = workload.metadata.labels.as_ref();
        let database_type: DatabaseType = match labels
            .and_then(|l| l.get(TYPE_LABEL))
            .and_then(|v| v.parse().ok())
        {
            Some(ty) => ty,
            None => {
                warn!(workload = %name, "skipping workload without a database type label");
                continue;
            }
        };
        let policy = database_type.policy();

        // The paired service is the liveness signal: a workload whose
        // service is gone is unreachable no matter what its pods say.
        let status = match services.get(&name).await {
            Ok(_) => "running",
            Err(err) => {
                if !is_api_status(&err, 404) {
                    warn!(service = %name, error = %err, "service lookup failed");
                }
                "error"
            }
        };

        summaries.push(DatabaseSummary {
            admin_url: naming::admin_url(&ctx.entry_host, namespace, &name, policy.admin_suffix),
            admin_type: policy.admin_display_name.to_string(),
            user_id: labels
                .and_then(|l| l.get(USER_ID_LABEL))
                .cloned()
                .unwrap_or_default(),
            created_at: workload.metadata.creation_timestamp.map(|t| t.0),
            name,
            database_type,
            status: status.to_string(),
            namespace: namespace.to_string(),
        });
    }
    Ok(summaries)
}

/// List all tenant namespaces with their database counts.
#[instrument(skip(ctx))]
pub async fn list_namespaces(ctx: &Context) -> Result<Vec<NamespaceSummary>> {
    let namespaces = ctx.namespaces();
    let params = ListParams::default().labels(USER_NAMESPACE_SELECTOR);
    let database_params = ListParams::default().labels(DATABASE_SELECTOR);

    let mut summaries = Vec::new();
    for namespace in namespaces.list(&params).await? {
        let Some(name) = namespace.metadata.name.clone() else {
            continue;
        };
        let database_count = match ctx.deployments(&name).list(&database_params).await {
            Ok(list) => list.items.len(),
            Err(err) => {
                warn!(namespace = %name, error = %err, "database count unavailable");
                0
            }
        };
        summaries.push(NamespaceSummary {
            status: namespace
                .status
                .as_ref()
                .and_then(|s| s.phase.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            created_at: namespace.metadata.creation_timestamp.map(|t| t.0),
            name,
            database_count,
        });
    }
    Ok(summaries)
}
