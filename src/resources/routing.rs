//! Traefik routing-rule and middleware generation
//!
//! Routing objects are Traefik custom resources (`traefik.io/v1alpha1`), so
//! they have no typed representation in k8s-openapi. Internally they are the
//! typed [`Middleware`] and [`RoutingRule`] structs below; they become
//! untyped [`DynamicObject`]s only at the API boundary.
//!
//! Exactly one headers middleware is attached to every admin route. A path
//! rewrite is attached only when the policy table says the console cannot
//! handle subpaths (phpMyAdmin); pgAdmin routes forward the path untouched.
//! Attaching both a strip and a rewrite, or rewriting a pgAdmin route, breaks
//! the console's redirect loop handling, so the choice is made in one place.

use std::collections::BTreeMap;

use kube::api::{ApiResource, DynamicObject, GroupVersionKind};
use serde_json::json;

use crate::model::ProvisionRequest;
use crate::naming;
use crate::policy::PathStrategy;
use crate::resources::common::MANAGED_BY;

/// A Traefik middleware, one variant per supported middleware type.
///
/// `StripPrefix` and `ReplacePathRegex` are mutually exclusive on a route:
/// both rewrite the path the console receives, and applying either one twice
/// over (or to a subpath-aware console) produces 404s or redirect loops.
/// Current policy only ever selects `ReplacePathRegex`; `StripPrefix` remains
/// for completeness of the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Middleware {
    /// Inject custom request headers.
    Headers {
        custom_request_headers: BTreeMap<String, String>,
    },
    /// Remove the listed prefixes from the request path.
    StripPrefix { prefixes: Vec<String> },
    /// Rewrite the request path by regex.
    ReplacePathRegex { regex: String, replacement: String },
}

impl Middleware {
    /// The `spec` object of the Traefik Middleware resource.
    pub fn spec(&self) -> serde_json::Value {
        match self {
            Middleware::Headers {
                custom_request_headers,
            } => json!({
                "headers": { "customRequestHeaders": custom_request_headers }
            }),
            Middleware::StripPrefix { prefixes } => json!({
                "stripPrefix": { "prefixes": prefixes }
            }),
            Middleware::ReplacePathRegex { regex, replacement } => json!({
                "replacePathRegex": { "regex": regex, "replacement": replacement }
            }),
        }
    }

    /// True for the path-rewriting variants.
    pub fn rewrites_path(&self) -> bool {
        !matches!(self, Middleware::Headers { .. })
    }
}

/// A Traefik IngressRoute with a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingRule {
    pub name: String,
    pub namespace: String,
    /// Full Traefik match expression (host and path prefix).
    pub match_expr: String,
    /// Service the route targets.
    pub service_name: String,
    pub service_port: i32,
    /// Middleware names in application order: headers first, then rewrite.
    pub middlewares: Vec<String>,
}

/// The complete routing plan for one admin console.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    /// Middlewares to create, in creation order, paired with their names.
    pub middlewares: Vec<(String, Middleware)>,
    pub route: RoutingRule,
}

/// Build the routing plan for a provisioning request.
///
/// The path prefix in the match expression comes from the same derivation as
/// the admin URL and (for pgAdmin) SCRIPT_NAME; see [`crate::naming`].
pub fn plan_admin_route(req: &ProvisionRequest, namespace: &str, entry_host: &str) -> RoutePlan {
    let policy = req.database_type.policy();
    let prefix = naming::derive_path_prefix(namespace, &req.name, policy.admin_suffix);

    let headers_name = naming::headers_middleware_name(&req.name, policy.admin_suffix);
    let mut middlewares = vec![(
        headers_name.clone(),
        Middleware::Headers {
            custom_request_headers: BTreeMap::from([
                ("X-User-ID".to_string(), req.user_id.to_string()),
                ("X-Username".to_string(), req.user_name.clone()),
                ("X-Namespace".to_string(), namespace.to_string()),
            ]),
        },
    )];

    let mut middleware_refs = vec![headers_name];
    if policy.path_strategy == PathStrategy::ReplacePathRegex {
        let rewrite_name = naming::replace_path_middleware_name(&req.name, policy.admin_suffix);
        middlewares.push((
            rewrite_name.clone(),
            Middleware::ReplacePathRegex {
                regex: format!("^{}/(.*)", prefix),
                replacement: "/$1".to_string(),
            },
        ));
        middleware_refs.push(rewrite_name);
    }

    RoutePlan {
        middlewares,
        route: RoutingRule {
            name: naming::ingress_route_name(&req.name, policy.admin_suffix),
            namespace: namespace.to_string(),
            match_expr: format!(r#"Host("{}") && PathPrefix("{}")"#, entry_host, prefix),
            service_name: naming::admin_name(&req.name, policy.admin_suffix),
            service_port: policy.admin_port,
            middlewares: middleware_refs,
        },
    }
}

/// ApiResource for `traefik.io/v1alpha1` Middleware objects.
pub fn middleware_api_resource() -> ApiResource {
    ApiResource::from_gvk_with_plural(
        &GroupVersionKind::gvk("traefik.io", "v1alpha1", "Middleware"),
        "middlewares",
    )
}

/// ApiResource for `traefik.io/v1alpha1` IngressRoute objects.
pub fn ingress_route_api_resource() -> ApiResource {
    ApiResource::from_gvk_with_plural(
        &GroupVersionKind::gvk("traefik.io", "v1alpha1", "IngressRoute"),
        "ingressroutes",
    )
}

/// Serialize a middleware to its dynamic wire form.
pub fn middleware_object(name: &str, namespace: &str, middleware: &Middleware) -> DynamicObject {
    let mut object = DynamicObject::new(name, &middleware_api_resource()).within(namespace);
    object.data = json!({ "spec": middleware.spec() });
    object
}

/// Serialize a routing rule to its dynamic wire form.
pub fn ingress_route_object(rule: &RoutingRule) -> DynamicObject {
    let mut object =
        DynamicObject::new(&rule.name, &ingress_route_api_resource()).within(&rule.namespace);
    object.metadata.labels = Some(BTreeMap::from([
        ("app".to_string(), rule.service_name.clone()),
        (
            "app.kubernetes.io/managed-by".to_string(),
            MANAGED_BY.to_string(),
        ),
    ]));
    object.data = json!({
        "spec": {
            "entryPoints": ["web"],
            "routes": [{
                "match": rule.match_expr,
                "kind": "Rule",
                "middlewares": rule
                    .middlewares
                    .iter()
                    .map(|name| json!({ "name": name }))
                    .collect::<Vec<_>>(),
                "services": [{
                    "name": rule.service_name,
                    "port": rule.service_port,
                }],
            }],
        }
    });
    object
}
