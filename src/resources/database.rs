//! Database workload and service generation
//!
//! One Deployment plus one ClusterIP Service per provisioned database. Specs
//! are pure functions of the request and namespace; nothing here talks to the
//! API server.

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, PodSpec, PodTemplateSpec, Service, ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::core::ObjectMeta;

use crate::model::ProvisionRequest;
use crate::policy::DatabaseType;
use crate::resources::common::{
    app_labels, database_resources, workload_labels, COMPONENT_DATABASE,
};

/// Generate the database Deployment for a provisioning request.
pub fn generate_database_deployment(req: &ProvisionRequest, namespace: &str) -> Deployment {
    let policy = req.database_type.policy();
    let labels = workload_labels(
        &req.name,
        COMPONENT_DATABASE,
        req.database_type,
        req.user_id,
    );

    Deployment {
        metadata: ObjectMeta {
            name: Some(req.name.clone()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(app_labels(&req.name)),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(app_labels(&req.name)),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: container_name(req.database_type).to_string(),
                        image: Some(policy.db_image.to_string()),
                        ports: Some(vec![ContainerPort {
                            container_port: policy.db_port,
                            ..Default::default()
                        }]),
                        env: Some(database_env(req)),
                        resources: Some(database_resources()),
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

/// Generate the ClusterIP service fronting the database.
pub fn generate_database_service(req: &ProvisionRequest, namespace: &str) -> Service {
    let policy = req.database_type.policy();

    Service {
        metadata: ObjectMeta {
            name: Some(req.name.clone()),
            namespace: Some(namespace.to_string()),
            labels: Some(app_labels(&req.name)),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            ports: Some(vec![ServicePort {
                port: policy.db_port,
                target_port: Some(IntOrString::Int(policy.db_port)),
                protocol: Some("TCP".to_string()),
                name: Some(container_name(req.database_type).to_string()),
                ..Default::default()
            }]),
            selector: Some(app_labels(&req.name)),
            type_: Some("ClusterIP".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn container_name(database_type: DatabaseType) -> &'static str {
    match database_type {
        DatabaseType::Mysql => "mysql",
        DatabaseType::Postgresql => "postgres",
    }
}

fn database_env(req: &ProvisionRequest) -> Vec<EnvVar> {
    let env = |name: &str, value: &str| EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        ..Default::default()
    };

    match req.database_type {
        DatabaseType::Postgresql => vec![
            env("POSTGRES_DB", &req.name),
            env("POSTGRES_USER", &req.username),
            env("POSTGRES_PASSWORD", &req.password),
        ],
        DatabaseType::Mysql => vec![
            env("MYSQL_ROOT_PASSWORD", &req.password),
            env("MYSQL_DATABASE", &req.name),
            env("MYSQL_USER", &req.username),
            env("MYSQL_PASSWORD", &req.password),
        ],
    }
}
