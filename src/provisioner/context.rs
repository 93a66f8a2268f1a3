//! Shared state for provisioning operations
//!
//! The context owns the Kubernetes client and the discovered routing API.
//! Typed APIs are built per namespace on demand; routing APIs are dynamic
//! because Traefik's types are CRDs.

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Namespace, Pod, Service};
use kube::api::{Api, ApiResource, DynamicObject};
use kube::Client;
use tracing::warn;

use crate::provisioner::error::{Error, Result};
use crate::resources::routing;

/// ApiResources for the Traefik CRDs, resolved at startup.
#[derive(Clone)]
pub struct RoutingApi {
    middleware: ApiResource,
    ingress_route: ApiResource,
}

#[derive(Clone)]
pub struct Context {
    client: Client,
    /// Externally reachable host of the cluster's HTTP entry point.
    pub entry_host: String,
    routing: Option<RoutingApi>,
}

impl Context {
    /// Build a context, probing the API server for the Traefik CRDs.
    ///
    /// When the CRDs are absent the context still serves listing and
    /// decommissioning, but provisioning fails closed with
    /// [`Error::RoutingUnavailable`].
    pub async fn discover(client: Client, entry_host: String) -> Self {
        let routing = match kube::discovery::group(&client, "traefik.io").await {
            Ok(group) => {
                let middleware = group.recommended_kind("Middleware").map(|(ar, _)| ar);
                let ingress_route = group.recommended_kind("IngressRoute").map(|(ar, _)| ar);
                match (middleware, ingress_route) {
                    (Some(middleware), Some(ingress_route)) => Some(RoutingApi {
                        middleware,
                        ingress_route,
                    }),
                    _ => {
                        warn!("traefik.io group found but Middleware/IngressRoute kinds missing, routing disabled");
                        None
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "traefik.io API group not discoverable, routing disabled");
                None
            }
        };
        Self {
            client,
            entry_host,
            routing,
        }
    }

    /// Build a context that assumes the Traefik CRDs are installed, skipping
    /// discovery. Only tests use this; production startup always discovers.
    pub fn with_static_routing(client: Client, entry_host: String) -> Self {
        Self {
            client,
            entry_host,
            routing: Some(RoutingApi {
                middleware: routing::middleware_api_resource(),
                ingress_route: routing::ingress_route_api_resource(),
            }),
        }
    }

    pub fn client(&self) -> Client {
        self.client.clone()
    }

    pub fn routing_available(&self) -> bool {
        self.routing.is_some()
    }

    pub fn namespaces(&self) -> Api<Namespace> {
        Api::all(self.client.clone())
    }

    pub fn deployments(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub fn services(&self, namespace: &str) -> Api<Service> {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub fn all_pods(&self) -> Api<Pod> {
        Api::all(self.client.clone())
    }

    pub fn middlewares(&self, namespace: &str) -> Result<Api<DynamicObject>> {
        let routing = self.routing.as_ref().ok_or(Error::RoutingUnavailable)?;
        Ok(Api::namespaced_with(
            self.client.clone(),
            namespace,
            &routing.middleware,
        ))
    }

    pub fn ingress_routes(&self, namespace: &str) -> Result<Api<DynamicObject>> {
        let routing = self.routing.as_ref().ok_or(Error::RoutingUnavailable)?;
        Ok(Api::namespaced_with(
            self.client.clone(),
            namespace,
            &routing.ingress_route,
        ))
    }
}
