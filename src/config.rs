//! Runtime configuration from the environment
//!
//! Every setting has a default so the binary starts unconfigured in a dev
//! cluster. Malformed values fall back to the default with a warning rather
//! than aborting startup.

use std::env;
use std::net::SocketAddr;

use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP API listens on.
    pub bind_addr: SocketAddr,
    /// Externally reachable host of the cluster's Traefik entry point. Admin
    /// console URLs and route match rules are built from this.
    pub cluster_entry_host: String,
    pub store: StoreConfig,
}

/// Connection settings for the control database holding accounts.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl StoreConfig {
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.host, self.port, self.user, self.password, self.dbname
        )
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: parsed_env("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8000))),
            cluster_entry_host: string_env("CLUSTER_ENTRY_HOST", "10.9.21.201"),
            store: StoreConfig {
                host: string_env("DB_HOST", "localhost"),
                port: parsed_env("DB_PORT", 5432),
                user: string_env("DB_USER", "postgres"),
                password: string_env("DB_PASSWORD", ""),
                dbname: string_env("DB_NAME", "userdb"),
            },
        }
    }
}

fn string_env(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!(%name, %value, "unparseable value, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_string() {
        let store = StoreConfig {
            host: "db".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "pw".to_string(),
            dbname: "userdb".to_string(),
        };
        assert_eq!(
            store.connection_string(),
            "host=db port=5432 user=postgres password=pw dbname=userdb"
        );
    }
}
