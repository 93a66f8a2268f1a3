//! Provision, conflict, and decommission against a live cluster

use kube::api::DeleteParams;
use tenant_db_provisioner::model::ProvisionRequest;
use tenant_db_provisioner::naming;
use tenant_db_provisioner::policy::DatabaseType;
use tenant_db_provisioner::provisioner::{
    decommission, ensure_namespace, list_databases, provision,
};

use crate::test_context;

fn request(name: &str, ty: DatabaseType) -> ProvisionRequest {
    // The process id keys the tenant so concurrent runs stay apart.
    ProvisionRequest {
        name: name.to_string(),
        username: "app".to_string(),
        password: "integration-secret".to_string(),
        database_type: ty,
        user_id: std::process::id() as i64,
        user_name: "itest".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires a cluster with the Traefik CRDs"]
async fn test_ensure_namespace_is_idempotent() {
    let ctx = test_context().await;
    let namespace = naming::derive_namespace(std::process::id() as i64, "itest-ns");

    ensure_namespace(&ctx, &namespace).await.unwrap();
    ensure_namespace(&ctx, &namespace).await.unwrap();

    ctx.namespaces()
        .delete(&namespace, &DeleteParams::default())
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires a cluster with the Traefik CRDs"]
async fn test_provision_twice_conflicts() {
    let ctx = test_context().await;
    let req = request("conflict-db", DatabaseType::Postgresql);
    let namespace = naming::derive_namespace(req.user_id, &req.user_name);

    let response = provision(&ctx, &req).await.unwrap();
    assert_eq!(response.namespace, namespace);
    assert_eq!(response.status, "creating");

    let err = provision(&ctx, &req).await.unwrap_err();
    assert!(err.is_conflict());

    decommission(&ctx, &namespace, &req.name).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a cluster with the Traefik CRDs"]
async fn test_decommission_tolerates_missing_route() {
    let ctx = test_context().await;
    let req = request("tolerant-db", DatabaseType::Mysql);
    let namespace = naming::derive_namespace(req.user_id, &req.user_name);
    let policy = req.database_type.policy();

    provision(&ctx, &req).await.unwrap();

    // Remove the route out of band, as an operator cleaning up would.
    ctx.ingress_routes(&namespace)
        .unwrap()
        .delete(
            &naming::ingress_route_name(&req.name, policy.admin_suffix),
            &DeleteParams::default(),
        )
        .await
        .unwrap();

    decommission(&ctx, &namespace, &req.name).await.unwrap();

    let remaining = list_databases(&ctx, &namespace).await.unwrap();
    assert!(remaining.iter().all(|db| db.name != req.name));
}

#[tokio::test]
#[ignore = "requires a cluster with the Traefik CRDs"]
async fn test_listing_reports_provisioned_database() {
    let ctx = test_context().await;
    let req = request("listed-db", DatabaseType::Postgresql);
    let namespace = naming::derive_namespace(req.user_id, &req.user_name);

    let response = provision(&ctx, &req).await.unwrap();

    let databases = list_databases(&ctx, &namespace).await.unwrap();
    let listed = databases
        .iter()
        .find(|db| db.name == req.name)
        .expect("provisioned database should be listed");
    assert_eq!(listed.admin_url, response.admin_url);
    assert_eq!(listed.database_type, req.database_type);

    decommission(&ctx, &namespace, &req.name).await.unwrap();
}
