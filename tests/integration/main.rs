//! Cluster-backed tests, ignored by default.
//!
//! Run with `cargo test --test integration -- --ignored` against a cluster
//! that has the Traefik CRDs installed. Tests create and delete resources in
//! namespaces derived from the current process id so parallel runs do not
//! collide.

#[path = "../common/mod.rs"]
mod common;

mod lifecycle;
mod store;

use kube::Client;
use tenant_db_provisioner::provisioner::Context;

pub async fn test_context() -> Context {
    let _ = rustls::crypto::ring::default_provider().install_default();
    let client = Client::try_default()
        .await
        .expect("a reachable kubeconfig is required for integration tests");
    Context::discover(client, common::ENTRY_HOST.to_string()).await
}
