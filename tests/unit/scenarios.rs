//! End-to-end shape checks for the two provisioning flavors

use tenant_db_provisioner::naming;
use tenant_db_provisioner::resources::{admin, database, routing};

use crate::common::{mysql_request, postgres_request, ENTRY_HOST};

#[test]
fn test_postgres_provisioning_shapes() {
    let req = postgres_request();
    let namespace = naming::derive_namespace(req.user_id, &req.user_name);
    assert_eq!(namespace, "7alice");

    let workload = database::generate_database_deployment(&req, &namespace);
    let container = &workload.spec.as_ref().unwrap().template.spec.as_ref().unwrap().containers[0];
    assert_eq!(container.image.as_deref(), Some("postgres:14"));

    // The console is told its subpath; the route must not rewrite it.
    let console = admin::generate_admin_deployment(&req, &namespace);
    let env = console.spec.as_ref().unwrap().template.spec.as_ref().unwrap().containers[0]
        .env
        .as_ref()
        .unwrap();
    let script_name = env
        .iter()
        .find(|e| e.name == "SCRIPT_NAME")
        .and_then(|e| e.value.as_deref());
    assert_eq!(script_name, Some("/7alice/orders-db-pgadmin"));

    let plan = routing::plan_admin_route(&req, &namespace, ENTRY_HOST);
    assert_eq!(plan.middlewares.len(), 1);
    assert!(plan.middlewares.iter().all(|(_, m)| !m.rewrites_path()));
    assert_eq!(
        plan.route.match_expr,
        r#"Host("10.9.21.201") && PathPrefix("/7alice/orders-db-pgadmin")"#
    );
}

#[test]
fn test_mysql_provisioning_shapes() {
    let req = mysql_request();
    let namespace = naming::derive_namespace(req.user_id, &req.user_name);
    assert_eq!(namespace, "3bob");

    let workload = database::generate_database_deployment(&req, &namespace);
    let container = &workload.spec.as_ref().unwrap().template.spec.as_ref().unwrap().containers[0];
    assert_eq!(container.image.as_deref(), Some("mysql:8.0"));
    assert_eq!(container.ports.as_ref().unwrap()[0].container_port, 3306);

    // phpMyAdmin has no subpath awareness, so the route rewrites for it.
    let console = admin::generate_admin_deployment(&req, &namespace);
    let env = console.spec.as_ref().unwrap().template.spec.as_ref().unwrap().containers[0]
        .env
        .as_ref()
        .unwrap();
    assert!(env.iter().all(|e| e.name != "SCRIPT_NAME"));

    let plan = routing::plan_admin_route(&req, &namespace, ENTRY_HOST);
    assert_eq!(plan.middlewares.len(), 2);
    let rewrite = plan
        .middlewares
        .iter()
        .find(|(_, m)| m.rewrites_path())
        .unwrap();
    assert_eq!(
        rewrite.1,
        routing::Middleware::ReplacePathRegex {
            regex: "^/3bob/catalog-phpmyadmin/(.*)".to_string(),
            replacement: "/$1".to_string(),
        }
    );
}

#[test]
fn test_route_and_console_agree_on_prefix() {
    for req in [postgres_request(), mysql_request()] {
        let namespace = naming::derive_namespace(req.user_id, &req.user_name);
        let policy = req.database_type.policy();
        let prefix = naming::derive_path_prefix(&namespace, &req.name, policy.admin_suffix);

        let plan = routing::plan_admin_route(&req, &namespace, ENTRY_HOST);
        assert!(plan.route.match_expr.ends_with(&format!(r#"PathPrefix("{}")"#, prefix)));

        let url = naming::admin_url(ENTRY_HOST, &namespace, &req.name, policy.admin_suffix);
        assert_eq!(url, format!("http://{}{}", ENTRY_HOST, prefix));
    }
}

#[test]
fn test_database_and_service_names_match() {
    for req in [postgres_request(), mysql_request()] {
        let namespace = naming::derive_namespace(req.user_id, &req.user_name);
        let workload = database::generate_database_deployment(&req, &namespace);
        let service = database::generate_database_service(&req, &namespace);
        assert_eq!(workload.metadata.name, service.metadata.name);
        assert_eq!(
            service.spec.unwrap().selector.unwrap().get("app"),
            Some(&req.name)
        );
    }
}
