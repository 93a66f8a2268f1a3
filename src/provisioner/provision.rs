//! The provisioning sequence
//!
//! Seven ordered steps: namespace, database workload, database service, admin
//! workload, admin service, middlewares, route. A failure stops the run and
//! reports the step; nothing already created is rolled back. Routing
//! availability is checked before the first create so a database is never
//! left standing without its route.

use std::fmt::Debug;

use kube::api::{Api, PostParams};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, instrument};

use crate::model::{DatabaseResponse, ProvisionRequest};
use crate::naming;
use crate::provisioner::context::Context;
use crate::provisioner::error::{Error, Result};
use crate::provisioner::namespace::ensure_namespace;
use crate::provisioner::step::ProvisionStep;
use crate::resources::{admin, database, routing};

/// Provision a database, its admin console, and its routing for a tenant.
#[instrument(skip(ctx, req), fields(database = %req.name, user_id = req.user_id))]
pub async fn provision(ctx: &Context, req: &ProvisionRequest) -> Result<DatabaseResponse> {
    req.validate().map_err(Error::InvalidRequest)?;
    if !ctx.routing_available() {
        return Err(Error::RoutingUnavailable);
    }

    let namespace = naming::derive_namespace(req.user_id, &req.user_name);
    let policy = req.database_type.policy();
    let fail_at = |err: Error, step: ProvisionStep| err.at_step(step, &req.name, &namespace);

    ensure_namespace(ctx, &namespace)
        .await
        .map_err(|e| fail_at(e, ProvisionStep::EnsureNamespace))?;

    create(
        &ctx.deployments(&namespace),
        "Deployment",
        &namespace,
        &database::generate_database_deployment(req, &namespace),
    )
    .await
    .map_err(|e| fail_at(e, ProvisionStep::CreateDatabaseWorkload))?;

    create(
        &ctx.services(&namespace),
        "Service",
        &namespace,
        &database::generate_database_service(req, &namespace),
    )
    .await
    .map_err(|e| fail_at(e, ProvisionStep::CreateDatabaseService))?;

    create(
        &ctx.deployments(&namespace),
        "Deployment",
        &namespace,
        &admin::generate_admin_deployment(req, &namespace),
    )
    .await
    .map_err(|e| fail_at(e, ProvisionStep::CreateAdminWorkload))?;

    create(
        &ctx.services(&namespace),
        "Service",
        &namespace,
        &admin::generate_admin_service(req, &namespace),
    )
    .await
    .map_err(|e| fail_at(e, ProvisionStep::CreateAdminService))?;

    let plan = routing::plan_admin_route(req, &namespace, &ctx.entry_host);

    let middleware_api = ctx.middlewares(&namespace)?;
    for (name, middleware) in &plan.middlewares {
        create(
            &middleware_api,
            "Middleware",
            &namespace,
            &routing::middleware_object(name, &namespace, middleware),
        )
        .await
        .map_err(|e| fail_at(e, ProvisionStep::CreateMiddleware))?;
    }

    create(
        &ctx.ingress_routes(&namespace)?,
        "IngressRoute",
        &namespace,
        &routing::ingress_route_object(&plan.route),
    )
    .await
    .map_err(|e| fail_at(e, ProvisionStep::CreateRoute))?;

    info!(namespace = %namespace, "provisioned database and admin console");

    Ok(DatabaseResponse {
        name: req.name.clone(),
        host: naming::service_dns(&req.name, &namespace),
        port: policy.db_port.to_string(),
        username: req.username.clone(),
        database_type: req.database_type,
        status: "creating".to_string(),
        message: format!(
            "Database {} and {} console are being provisioned",
            req.name, policy.admin_display_name
        ),
        namespace: namespace.clone(),
        admin_url: naming::admin_url(&ctx.entry_host, &namespace, &req.name, policy.admin_suffix),
        admin_type: policy.admin_display_name.to_string(),
    })
}

async fn create<K>(api: &Api<K>, kind: &'static str, namespace: &str, object: &K) -> Result<()>
where
    K: kube::Resource + Clone + Debug + Serialize + DeserializeOwned,
{
    let name = object
        .meta()
        .name
        .clone()
        .unwrap_or_default();
    api.create(&PostParams::default(), object)
        .await
        .map(|_| ())
        .map_err(|err| Error::from_create(kind, &name, namespace, err))
}
