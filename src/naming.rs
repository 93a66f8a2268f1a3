//! Deterministic naming for tenant namespaces, workloads, and routes
//!
//! Every externally visible name in the system is derived here and nowhere
//! else. The path prefix in particular must appear byte-identically in three
//! places: the IngressRoute match predicate, the admin URL returned to the
//! caller, and (for pgAdmin) the console's own SCRIPT_NAME configuration.
//! Routing breaks silently if any of them drift, so all three call into this
//! module.

/// Kubernetes limits namespace names to 63 characters.
pub const MAX_NAMESPACE_LEN: usize = 63;

/// Derive the tenant namespace from the tenant id and handle.
///
/// The name is the decimal tenant id concatenated with the handle, truncated
/// to 63 characters. Two handles sharing the same 63-character prefix map to
/// the same namespace; this collision is a known accepted risk and is
/// deliberately not papered over here.
pub fn derive_namespace(tenant_id: i64, tenant_handle: &str) -> String {
    let mut name = format!("{}{}", tenant_id, tenant_handle);
    if name.len() > MAX_NAMESPACE_LEN {
        let mut end = MAX_NAMESPACE_LEN;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        name.truncate(end);
    }
    name
}

/// Name of the database workload and its service (the database name verbatim).
pub fn database_name(database_name: &str) -> String {
    database_name.to_string()
}

/// Name of the admin-console workload and its service.
pub fn admin_name(database_name: &str, admin_suffix: &str) -> String {
    format!("{}-{}", database_name, admin_suffix)
}

/// Name of the headers middleware for an admin console.
pub fn headers_middleware_name(database_name: &str, admin_suffix: &str) -> String {
    format!("{}-{}-headers", database_name, admin_suffix)
}

/// Name of the path-rewrite middleware for an admin console.
pub fn replace_path_middleware_name(database_name: &str, admin_suffix: &str) -> String {
    format!("{}-{}-replacepath", database_name, admin_suffix)
}

/// Name of the IngressRoute for an admin console.
pub fn ingress_route_name(database_name: &str, admin_suffix: &str) -> String {
    format!("{}-{}-ingress", database_name, admin_suffix)
}

/// The external path prefix under which an admin console is reachable.
pub fn derive_path_prefix(namespace: &str, database_name: &str, admin_suffix: &str) -> String {
    format!("/{}/{}-{}", namespace, database_name, admin_suffix)
}

/// The external admin-console URL: cluster entry host plus path prefix.
///
/// The Lister reconstructs this from labels with the same formula the
/// Provisioner uses at creation time, so the two can never disagree.
pub fn admin_url(entry_host: &str, namespace: &str, database_name: &str, admin_suffix: &str) -> String {
    format!(
        "http://{}{}",
        entry_host,
        derive_path_prefix(namespace, database_name, admin_suffix)
    )
}

/// In-cluster DNS name of the database service.
pub fn service_dns(database_name: &str, namespace: &str) -> String {
    format!("{}.{}.svc.cluster.local", database_name, namespace)
}
