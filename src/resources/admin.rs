//! Admin-console workload and service generation
//!
//! Each database gets exactly one admin console: pgAdmin for PostgreSQL,
//! phpMyAdmin for MySQL. The pgAdmin container is told its subpath through
//! SCRIPT_NAME and therefore expects full, un-rewritten request paths;
//! phpMyAdmin expects root-relative paths and relies on the route rewriting
//! them. That split is encoded in the policy table and mirrored by the
//! routing builder.

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, PodSpec, PodTemplateSpec, Service, ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::core::ObjectMeta;

use crate::model::ProvisionRequest;
use crate::naming;
use crate::policy::DatabaseType;
use crate::resources::common::{admin_resources, app_labels, workload_labels, COMPONENT_ADMIN};

/// Generate the admin-console Deployment for a provisioning request.
pub fn generate_admin_deployment(req: &ProvisionRequest, namespace: &str) -> Deployment {
    let policy = req.database_type.policy();
    let name = naming::admin_name(&req.name, policy.admin_suffix);
    let labels = workload_labels(&name, COMPONENT_ADMIN, req.database_type, req.user_id);

    Deployment {
        metadata: ObjectMeta {
            name: Some(name.clone()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(app_labels(&name)),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(app_labels(&name)),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: policy.admin_suffix.to_string(),
                        image: Some(policy.admin_image.to_string()),
                        ports: Some(vec![ContainerPort {
                            container_port: policy.admin_port,
                            ..Default::default()
                        }]),
                        env: Some(admin_env(req, namespace)),
                        resources: Some(admin_resources()),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Generate the ClusterIP service fronting the admin console.
pub fn generate_admin_service(req: &ProvisionRequest, namespace: &str) -> Service {
    let policy = req.database_type.policy();
    let name = naming::admin_name(&req.name, policy.admin_suffix);

    Service {
        metadata: ObjectMeta {
            name: Some(name.clone()),
            namespace: Some(namespace.to_string()),
            labels: Some(app_labels(&name)),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            ports: Some(vec![ServicePort {
                port: policy.admin_port,
                target_port: Some(IntOrString::Int(policy.admin_port)),
                protocol: Some("TCP".to_string()),
                name: Some("http".to_string()),
                ..Default::default()
            }]),
            selector: Some(app_labels(&name)),
            type_: Some("ClusterIP".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn admin_env(req: &ProvisionRequest, namespace: &str) -> Vec<EnvVar> {
    let env = |name: &str, value: String| EnvVar {
        name: name.to_string(),
        value: Some(value),
        ..Default::default()
    };
    let policy = req.database_type.policy();

    match req.database_type {
        DatabaseType::Postgresql => {
            // SCRIPT_NAME must be byte-identical to the route's path prefix,
            // otherwise pgAdmin redirects to paths the route will not match.
            let script_name =
                naming::derive_path_prefix(namespace, &req.name, policy.admin_suffix);
            vec![
                env(
                    "PGADMIN_DEFAULT_EMAIL",
                    format!("{}@gmail.com", req.username),
                ),
                env("PGADMIN_DEFAULT_PASSWORD", req.password.clone()),
                env("SCRIPT_NAME", script_name),
                env("PGADMIN_CONFIG_WTF_CSRF_ENABLED", "False".to_string()),
                env(
                    "PGADMIN_CONFIG_SESSION_COOKIE_SECURE",
                    "False".to_string(),
                ),
                env("PGADMIN_LISTEN_ADDRESS", "0.0.0.0".to_string()),
                env("PGADMIN_LISTEN_PORT", "80".to_string()),
            ]
        }
        DatabaseType::Mysql => vec![
            env("PMA_HOST", req.name.clone()),
            env("PMA_PORT", "3306".to_string()),
            env("PMA_USER", req.username.clone()),
            env("PMA_PASSWORD", req.password.clone()),
            env("MYSQL_ROOT_PASSWORD", req.password.clone()),
        ],
    }
}
