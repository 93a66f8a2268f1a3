//! Decommissioning a provisioned database
//!
//! The database type is read back from the workload's label, never taken
//! from the caller, so a stale client cannot make us delete the wrong
//! console. Deletion runs in reverse dependency order with the route first,
//! so traffic stops before backends disappear. Every delete except the last
//! is best effort: a missing object is already the desired state, and any
//! other failure is logged and skipped so one stuck object cannot wedge the
//! whole teardown. Only a failure to delete the database workload itself is
//! reported, because that is the one object whose survival means the
//! decommission did not happen.

use std::fmt::Debug;

use kube::api::{Api, DeleteParams};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::naming;
use crate::policy::{DatabaseType, PathStrategy};
use crate::provisioner::context::Context;
use crate::provisioner::error::{is_api_status, Error, Result};
use crate::resources::common::TYPE_LABEL;

/// Tear down a database, its admin console, and its routing.
#[instrument(skip(ctx))]
pub async fn decommission(ctx: &Context, namespace: &str, name: &str) -> Result<()> {
    let deployments = ctx.deployments(namespace);

    let workload = deployments.get(name).await.map_err(|err| {
        if is_api_status(&err, 404) {
            Error::ResourceNotFound {
                kind: "Deployment",
                name: name.to_string(),
                namespace: namespace.to_string(),
            }
        } else {
            Error::Kube(err)
        }
    })?;

    let database_type: DatabaseType = workload
        .metadata
        .labels
        .as_ref()
        .and_then(|labels| labels.get(TYPE_LABEL))
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| Error::UnknownDatabaseType {
            name: name.to_string(),
            namespace: namespace.to_string(),
        })?;
    let policy = database_type.policy();
    let admin = naming::admin_name(name, policy.admin_suffix);

    match ctx.ingress_routes(namespace) {
        Ok(api) => {
            let route = naming::ingress_route_name(name, policy.admin_suffix);
            delete_best_effort(&api, "IngressRoute", &route).await;
        }
        Err(_) => warn!("routing API unavailable, skipping route deletion"),
    }

    match ctx.middlewares(namespace) {
        Ok(api) => {
            delete_best_effort(
                &api,
                "Middleware",
                &naming::headers_middleware_name(name, policy.admin_suffix),
            )
            .await;
            if policy.path_strategy == PathStrategy::ReplacePathRegex {
                delete_best_effort(
                    &api,
                    "Middleware",
                    &naming::replace_path_middleware_name(name, policy.admin_suffix),
                )
                .await;
            }
        }
        Err(_) => warn!("routing API unavailable, skipping middleware deletion"),
    }

    let services = ctx.services(namespace);
    delete_best_effort(&services, "Service", &admin).await;
    delete_best_effort(&deployments, "Deployment", &admin).await;
    delete_best_effort(&services, "Service", name).await;

    // The one delete whose failure the caller must hear about.
    match deployments.delete(name, &DeleteParams::default()).await {
        Ok(_) => {
            info!(%database_type, "decommissioned database");
            Ok(())
        }
        Err(err) if is_api_status(&err, 404) => {
            info!(%database_type, "database workload already gone");
            Ok(())
        }
        Err(err) => Err(Error::Kube(err)),
    }
}

async fn delete_best_effort<K>(api: &Api<K>, kind: &str, name: &str)
where
    K: Clone + Debug + DeserializeOwned,
{
    match api.delete(name, &DeleteParams::default()).await {
        Ok(_) => debug!(kind, name, "deleted"),
        Err(err) if is_api_status(&err, 404) => debug!(kind, name, "already absent"),
        Err(err) => warn!(kind, name, error = %err, "delete failed, continuing"),
    }
}
