//! Request and response types for the provisioning API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::DatabaseType;

/// A request to provision a database with its admin console for a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionRequest {
    /// Database name; must match `[a-z0-9-]+` and be unique within the
    /// tenant namespace (uniqueness is enforced by the API server's create
    /// conflict, not here).
    pub name: String,
    /// Database user to create.
    pub username: String,
    /// Database password, also used for the admin console login.
    pub password: String,
    /// Engine to provision.
    #[serde(rename = "type")]
    pub database_type: DatabaseType,
    /// Owning tenant id.
    pub user_id: i64,
    /// Owning tenant handle, used for namespace derivation.
    pub user_name: String,
}

impl ProvisionRequest {
    /// Validate the request fields that the provisioner depends on.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty()
            || !self
                .name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(format!(
                "database name {:?} must match [a-z0-9-]+",
                self.name
            ));
        }
        if self.user_id <= 0 || self.user_name.is_empty() {
            return Err("user id and user name are required".to_string());
        }
        if self.username.is_empty() || self.password.is_empty() {
            return Err("database username and password are required".to_string());
        }
        Ok(())
    }
}

/// Returned to the caller after a successful provision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseResponse {
    pub name: String,
    /// In-cluster DNS name of the database service.
    pub host: String,
    pub port: String,
    pub username: String,
    #[serde(rename = "type")]
    pub database_type: DatabaseType,
    pub status: String,
    pub message: String,
    pub namespace: String,
    pub admin_url: String,
    pub admin_type: String,
}

/// One provisioned database as reported by the lister.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub database_type: DatabaseType,
    /// "running" if the paired service exists, "error" otherwise.
    pub status: String,
    pub namespace: String,
    pub user_id: String,
    /// Reconstructed from labels with the creation-time formula, never read
    /// back from storage.
    pub admin_url: String,
    pub admin_type: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// One tenant namespace with aggregate counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceSummary {
    pub name: String,
    /// Namespace lifecycle phase as reported by the API server.
    pub status: String,
    pub database_count: usize,
    pub created_at: Option<DateTime<Utc>>,
}
