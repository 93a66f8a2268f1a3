//! Tenant namespace creation
//!
//! Namespace creation is get-then-create and idempotent. A 409 on the create
//! means another request won the race, which is success for our purposes.
//! This is the one place a 409 is benign; workload creates treat it as a
//! caller error.

use k8s_openapi::api::core::v1::Namespace;
use kube::api::PostParams;
use kube::core::ObjectMeta;
use tracing::{debug, info};

use crate::provisioner::context::Context;
use crate::provisioner::error::{is_api_status, Error, Result};
use crate::resources::common::namespace_labels;

/// Ensure the tenant namespace exists, creating it with tenant labels when
/// missing. Any failure other than the benign create race maps to
/// [`Error::NamespaceUnavailable`].
pub async fn ensure_namespace(ctx: &Context, name: &str) -> Result<()> {
    let api = ctx.namespaces();

    match api.get(name).await {
        Ok(_) => {
            debug!(namespace = %name, "namespace already exists");
            return Ok(());
        }
        Err(err) if is_api_status(&err, 404) => {}
        Err(err) => {
            return Err(Error::NamespaceUnavailable {
                namespace: name.to_string(),
                source: err,
            })
        }
    }

    let namespace = Namespace {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            labels: Some(namespace_labels()),
            ..Default::default()
        },
        ..Default::default()
    };

    match api.create(&PostParams::default(), &namespace).await {
        Ok(_) => {
            info!(namespace = %name, "created tenant namespace");
            Ok(())
        }
        // Lost the create race; the namespace exists, which is what we want.
        Err(err) if is_api_status(&err, 409) => {
            debug!(namespace = %name, "namespace created concurrently");
            Ok(())
        }
        Err(err) => Err(Error::NamespaceUnavailable {
            namespace: name.to_string(),
            source: err,
        }),
    }
}
