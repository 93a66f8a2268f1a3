//! Shared fixtures for unit and integration tests

#![allow(dead_code)]

use tenant_db_provisioner::model::ProvisionRequest;
use tenant_db_provisioner::policy::DatabaseType;

pub const ENTRY_HOST: &str = "10.9.21.201";

/// Tenant 7 ("alice") asking for a PostgreSQL database named orders-db.
pub fn postgres_request() -> ProvisionRequest {
    ProvisionRequest {
        name: "orders-db".to_string(),
        username: "app".to_string(),
        password: "secret".to_string(),
        database_type: DatabaseType::Postgresql,
        user_id: 7,
        user_name: "alice".to_string(),
    }
}

/// Tenant 3 ("bob") asking for a MySQL database named catalog.
pub fn mysql_request() -> ProvisionRequest {
    ProvisionRequest {
        name: "catalog".to_string(),
        username: "app".to_string(),
        password: "secret".to_string(),
        database_type: DatabaseType::Mysql,
        user_id: 3,
        user_name: "bob".to_string(),
    }
}
