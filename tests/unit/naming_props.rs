//! Naming determinism properties

use tenant_db_provisioner::naming;

use crate::common::ENTRY_HOST;

#[test]
fn test_namespace_derivation_is_pure() {
    for (id, handle) in [(7, "alice"), (3, "bob"), (12345, "very-long-tenant-handle")] {
        let first = naming::derive_namespace(id, handle);
        let second = naming::derive_namespace(id, handle);
        assert_eq!(first, second);
        assert!(first.len() <= naming::MAX_NAMESPACE_LEN);
    }
}

#[test]
fn test_truncation_keeps_id_prefix() {
    let handle = "x".repeat(200);
    let namespace = naming::derive_namespace(987654, &handle);
    assert_eq!(namespace.len(), naming::MAX_NAMESPACE_LEN);
    assert!(namespace.starts_with("987654"));
}

// The lister rebuilds admin URLs from labels rather than storing them, so
// the rebuild must be byte-identical to what provisioning returned.
#[test]
fn test_admin_url_reconstruction_round_trips() {
    let cases = [
        ("7alice", "orders-db", "pgadmin"),
        ("3bob", "catalog", "phpmyadmin"),
    ];
    for (namespace, name, suffix) in cases {
        let at_creation = naming::admin_url(ENTRY_HOST, namespace, name, suffix);
        let at_listing = format!(
            "http://{}{}",
            ENTRY_HOST,
            naming::derive_path_prefix(namespace, name, suffix)
        );
        assert_eq!(at_creation, at_listing);
    }
}

#[test]
fn test_derived_resource_names_are_distinct() {
    let names = [
        naming::database_name("orders-db"),
        naming::admin_name("orders-db", "pgadmin"),
        naming::headers_middleware_name("orders-db", "pgadmin"),
        naming::replace_path_middleware_name("orders-db", "pgadmin"),
        naming::ingress_route_name("orders-db", "pgadmin"),
    ];
    for (i, a) in names.iter().enumerate() {
        for b in names.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}
