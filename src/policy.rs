//! Per-database-type policy table
//!
//! Everything that differs between MySQL and PostgreSQL provisioning is
//! decided here: images, ports, admin console, and the admin console's
//! mount-path strategy. Resource creation and routing creation both consult
//! this table, so the strategy cannot drift between them.
//!
//! The mount-path strategies are a product decision, not incidental:
//! - pgAdmin is told its subpath through the SCRIPT_NAME environment
//!   variable and must receive full, un-rewritten paths. Its route carries
//!   a headers middleware only.
//! - phpMyAdmin has no subpath awareness and must receive root-relative
//!   paths. Its route additionally rewrites `^{prefix}/(.*)` to `/$1`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatabaseType {
    #[serde(rename = "mysql")]
    Mysql,
    #[serde(rename = "postgresql")]
    Postgresql,
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseType::Mysql => write!(f, "mysql"),
            DatabaseType::Postgresql => write!(f, "postgresql"),
        }
    }
}

impl FromStr for DatabaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mysql" => Ok(DatabaseType::Mysql),
            "postgresql" => Ok(DatabaseType::Postgresql),
            other => Err(format!("unknown database type: {}", other)),
        }
    }
}

/// How the admin console's route handles the tenant path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStrategy {
    /// Forward the full path unchanged; the console knows its own subpath.
    PassThrough,
    /// Rewrite `^{prefix}/(.*)` to `/$1` so the console sees root-relative
    /// paths.
    ReplacePathRegex,
}

/// Fixed provisioning policy for one database type.
#[derive(Debug, Clone, Copy)]
pub struct DatabasePolicy {
    /// Pinned database container image.
    pub db_image: &'static str,
    /// Port the database listens on.
    pub db_port: i32,
    /// Admin console container image.
    pub admin_image: &'static str,
    /// Port the admin console listens on.
    pub admin_port: i32,
    /// Suffix appended to the database name for admin resources.
    pub admin_suffix: &'static str,
    /// Human-readable admin console name, as shown to callers.
    pub admin_display_name: &'static str,
    /// Mount-path strategy for the admin console's route.
    pub path_strategy: PathStrategy,
}

const POSTGRESQL_POLICY: DatabasePolicy = DatabasePolicy {
    db_image: "postgres:14",
    db_port: 5432,
    admin_image: "dpage/pgadmin4:latest",
    admin_port: 80,
    admin_suffix: "pgadmin",
    admin_display_name: "pgAdmin",
    path_strategy: PathStrategy::PassThrough,
};

const MYSQL_POLICY: DatabasePolicy = DatabasePolicy {
    db_image: "mysql:8.0",
    db_port: 3306,
    admin_image: "phpmyadmin:5.2",
    admin_port: 80,
    admin_suffix: "phpmyadmin",
    admin_display_name: "phpMyAdmin",
    path_strategy: PathStrategy::ReplacePathRegex,
};

impl DatabaseType {
    /// The fixed policy for this database type.
    pub fn policy(self) -> &'static DatabasePolicy {
        match self {
            DatabaseType::Mysql => &MYSQL_POLICY,
            DatabaseType::Postgresql => &POSTGRESQL_POLICY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgresql_policy() {
        let policy = DatabaseType::Postgresql.policy();
        assert_eq!(policy.db_image, "postgres:14");
        assert_eq!(policy.db_port, 5432);
        assert_eq!(policy.admin_suffix, "pgadmin");
        assert_eq!(policy.path_strategy, PathStrategy::PassThrough);
    }

    #[test]
    fn test_mysql_policy() {
        let policy = DatabaseType::Mysql.policy();
        assert_eq!(policy.db_image, "mysql:8.0");
        assert_eq!(policy.db_port, 3306);
        assert_eq!(policy.admin_suffix, "phpmyadmin");
        assert_eq!(policy.path_strategy, PathStrategy::ReplacePathRegex);
    }

    #[test]
    fn test_database_type_round_trip() {
        for ty in [DatabaseType::Mysql, DatabaseType::Postgresql] {
            assert_eq!(ty.to_string().parse::<DatabaseType>(), Ok(ty));
        }
        assert!("mongodb".parse::<DatabaseType>().is_err());
    }
}
