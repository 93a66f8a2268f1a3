//! Connection handling and queries for the control database

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{error, info};

use crate::config::StoreConfig;
use crate::model::DatabaseResponse;
use crate::store::auth::{hash_password, AuthUser, RegisterRequest};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("control database query failed")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("username {0} is already taken")]
    UsernameTaken(String),

    #[error("user {0} not found")]
    UserNotFound(i64),

    #[error("no database record for {name} in namespace {namespace}")]
    DatabaseRecordNotFound { name: String, namespace: String },
}

/// One provisioned database as recorded in the control database. This is the
/// bookkeeping view; the cluster remains the source of truth for what
/// actually runs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseRecord {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub database_type: String,
    pub host: String,
    pub port: String,
    pub username: String,
    pub namespace: String,
    pub user_id: i64,
    pub admin_url: String,
    pub admin_type: String,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Handle to the control database holding registered accounts.
pub struct Store {
    client: Client,
}

impl Store {
    /// Connect and create tables when missing. The connection task is
    /// spawned onto the runtime and logs its own termination.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(&config.connection_string(), NoTls).await?;
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                error!(error = %err, "control database connection closed");
            }
        });

        let store = Self { client };
        store.create_tables().await?;
        info!(host = %config.host, dbname = %config.dbname, "connected to control database");
        Ok(store)
    }

    async fn create_tables(&self) -> Result<()> {
        self.client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS auth_users (
                    id BIGSERIAL PRIMARY KEY,
                    username TEXT NOT NULL UNIQUE,
                    email TEXT NOT NULL,
                    password_hash TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
                );
                CREATE TABLE IF NOT EXISTS databases (
                    id BIGSERIAL PRIMARY KEY,
                    name TEXT NOT NULL,
                    type TEXT NOT NULL,
                    host TEXT NOT NULL,
                    port TEXT NOT NULL,
                    username TEXT NOT NULL,
                    namespace TEXT NOT NULL,
                    user_id BIGINT NOT NULL,
                    admin_url TEXT NOT NULL,
                    admin_type TEXT NOT NULL,
                    status TEXT NOT NULL DEFAULT 'creating',
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
                )",
            )
            .await?;
        Ok(())
    }

    /// Insert a new account with a hashed password. The UNIQUE constraint on
    /// username is the only duplicate check, so concurrent registrations
    /// cannot race past it.
    pub async fn register_user(&self, req: &RegisterRequest) -> Result<AuthUser> {
        let row = self
            .client
            .query_one(
                "INSERT INTO auth_users (username, email, password_hash)
                 VALUES ($1, $2, $3)
                 RETURNING id, username, email, created_at",
                &[&req.username, &req.email, &hash_password(&req.password)],
            )
            .await
            .map_err(|err| {
                if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    StoreError::UsernameTaken(req.username.clone())
                } else {
                    StoreError::Postgres(err)
                }
            })?;
        Ok(auth_user_from(&row))
    }

    /// Look an account up by username, returning its stored password hash
    /// alongside the public fields.
    pub async fn user_with_hash(&self, username: &str) -> Result<Option<(AuthUser, String)>> {
        let row = self
            .client
            .query_opt(
                "SELECT id, username, email, created_at, password_hash
                 FROM auth_users WHERE username = $1",
                &[&username],
            )
            .await?;
        Ok(row.map(|row| (auth_user_from(&row), row.get("password_hash"))))
    }

    pub async fn get_user(&self, id: i64) -> Result<AuthUser> {
        let row = self
            .client
            .query_opt(
                "SELECT id, username, email, created_at FROM auth_users WHERE id = $1",
                &[&id],
            )
            .await?;
        row.map(|row| auth_user_from(&row))
            .ok_or(StoreError::UserNotFound(id))
    }

    pub async fn get_all_users(&self) -> Result<Vec<AuthUser>> {
        let rows = self
            .client
            .query(
                "SELECT id, username, email, created_at FROM auth_users ORDER BY id",
                &[],
            )
            .await?;
        Ok(rows.iter().map(auth_user_from).collect())
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        let deleted = self
            .client
            .execute("DELETE FROM auth_users WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(StoreError::UserNotFound(id));
        }
        Ok(())
    }

    /// Record a freshly provisioned database with status "creating".
    pub async fn record_database(&self, db: &DatabaseResponse, user_id: i64) -> Result<DatabaseRecord> {
        let row = self
            .client
            .query_one(
                "INSERT INTO databases
                     (name, type, host, port, username, namespace, user_id,
                      admin_url, admin_type, status)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'creating')
                 RETURNING id, name, type, host, port, username, namespace,
                           user_id, admin_url, admin_type, status, created_at,
                           updated_at",
                &[
                    &db.name,
                    &db.database_type.to_string(),
                    &db.host,
                    &db.port,
                    &db.username,
                    &db.namespace,
                    &user_id,
                    &db.admin_url,
                    &db.admin_type,
                ],
            )
            .await?;
        Ok(database_record_from(&row))
    }

    /// All database records owned by one account, newest first.
    pub async fn user_databases(&self, user_id: i64) -> Result<Vec<DatabaseRecord>> {
        let rows = self
            .client
            .query(
                "SELECT id, name, type, host, port, username, namespace,
                        user_id, admin_url, admin_type, status, created_at,
                        updated_at
                 FROM databases WHERE user_id = $1
                 ORDER BY created_at DESC",
                &[&user_id],
            )
            .await?;
        Ok(rows.iter().map(database_record_from).collect())
    }

    /// Caller-driven status transition, e.g. "creating" to "running".
    pub async fn update_database_status(
        &self,
        name: &str,
        namespace: &str,
        status: &str,
    ) -> Result<()> {
        let updated = self
            .client
            .execute(
                "UPDATE databases SET status = $1, updated_at = now()
                 WHERE name = $2 AND namespace = $3",
                &[&status, &name, &namespace],
            )
            .await?;
        if updated == 0 {
            return Err(StoreError::DatabaseRecordNotFound {
                name: name.to_string(),
                namespace: namespace.to_string(),
            });
        }
        Ok(())
    }

    /// Drop the record for a decommissioned database.
    pub async fn delete_database_record(&self, name: &str, namespace: &str) -> Result<()> {
        let deleted = self
            .client
            .execute(
                "DELETE FROM databases WHERE name = $1 AND namespace = $2",
                &[&name, &namespace],
            )
            .await?;
        if deleted == 0 {
            return Err(StoreError::DatabaseRecordNotFound {
                name: name.to_string(),
                namespace: namespace.to_string(),
            });
        }
        Ok(())
    }
}

fn auth_user_from(row: &Row) -> AuthUser {
    AuthUser {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        created_at: row.get("created_at"),
    }
}


fn database_record_from(row: &Row) -> DatabaseRecord {
    DatabaseRecord {
        id: row.get("id"),
        name: row.get("name"),
        database_type: row.get("type"),
        host: row.get("host"),
        port: row.get("port"),
        username: row.get("username"),
        namespace: row.get("namespace"),
        user_id: row.get("user_id"),
        admin_url: row.get("admin_url"),
        admin_type: row.get("admin_type"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
