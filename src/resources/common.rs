//! Shared labels and constants for Kubernetes resource generation
//!
//! All generated resources carry the same managed-by marker so that listing,
//! decommissioning, and auditing can select them with one label selector.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::ResourceRequirements;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

use crate::policy::DatabaseType;

/// Value of the `app.kubernetes.io/managed-by` label on every resource.
pub const MANAGED_BY: &str = "db-saas";

/// Label key marking a namespace as a tenant namespace.
pub const USER_NAMESPACE_LABEL: &str = "db-saas/user-namespace";

/// Label key carrying the database type on workloads.
pub const TYPE_LABEL: &str = "db-saas/type";

/// Label key carrying the owning tenant id on workloads.
pub const USER_ID_LABEL: &str = "db-saas/user-id";

/// Component label value for database workloads.
pub const COMPONENT_DATABASE: &str = "database";

/// Component label value for admin-console workloads.
pub const COMPONENT_ADMIN: &str = "admin-dashboard";

/// Selector matching all database workloads managed by this system.
pub const DATABASE_SELECTOR: &str =
    "app.kubernetes.io/managed-by=db-saas,app.kubernetes.io/component=database";

/// Selector matching all tenant namespaces managed by this system.
pub const USER_NAMESPACE_SELECTOR: &str = "db-saas/user-namespace=true";

/// Labels shared by a workload's pod template and its service selector.
pub fn app_labels(app_name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("app".to_string(), app_name.to_string())])
}

/// Full label set for a workload owned by a tenant.
pub fn workload_labels(
    app_name: &str,
    component: &str,
    database_type: DatabaseType,
    user_id: i64,
) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("app".to_string(), app_name.to_string()),
        (
            "app.kubernetes.io/component".to_string(),
            component.to_string(),
        ),
        (
            "app.kubernetes.io/managed-by".to_string(),
            MANAGED_BY.to_string(),
        ),
        (TYPE_LABEL.to_string(), database_type.to_string()),
        (USER_ID_LABEL.to_string(), user_id.to_string()),
    ])
}

/// Labels for a tenant namespace.
pub fn namespace_labels() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "app.kubernetes.io/managed-by".to_string(),
            MANAGED_BY.to_string(),
        ),
        (USER_NAMESPACE_LABEL.to_string(), "true".to_string()),
    ])
}

/// Fixed resource band for database containers.
pub fn database_resources() -> ResourceRequirements {
    ResourceRequirements {
        requests: Some(BTreeMap::from([
            ("memory".to_string(), Quantity("256Mi".to_string())),
            ("cpu".to_string(), Quantity("100m".to_string())),
        ])),
        limits: Some(BTreeMap::from([
            ("memory".to_string(), Quantity("512Mi".to_string())),
            ("cpu".to_string(), Quantity("500m".to_string())),
        ])),
        ..Default::default()
    }
}

/// Fixed resource band for admin-console containers.
pub fn admin_resources() -> ResourceRequirements {
    ResourceRequirements {
        requests: Some(BTreeMap::from([
            ("memory".to_string(), Quantity("128Mi".to_string())),
            ("cpu".to_string(), Quantity("50m".to_string())),
        ])),
        limits: Some(BTreeMap::from([
            ("memory".to_string(), Quantity("256Mi".to_string())),
            ("cpu".to_string(), Quantity("200m".to_string())),
        ])),
        ..Default::default()
    }
}
