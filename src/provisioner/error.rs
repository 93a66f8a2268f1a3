//! Provisioning error taxonomy
//!
//! API-server status codes are classified here, in one place, because the
//! same code means different things in different phases. A 409 on a workload
//! create is a caller-visible conflict; a 409 on a namespace create is a
//! benign race. A 404 during decommissioning is tolerated; a 404 when reading
//! the workload to decommission is not.

use kube::core::ErrorResponse;
use thiserror::Error;

use crate::provisioner::step::ProvisionStep;

#[derive(Error, Debug)]
pub enum Error {
    /// The request failed validation before any resource was touched.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The tenant namespace could not be read or created.
    #[error("namespace {namespace} unavailable")]
    NamespaceUnavailable {
        namespace: String,
        #[source]
        source: kube::Error,
    },

    /// A resource to be created already exists.
    #[error("{kind} {name} already exists in namespace {namespace}")]
    ResourceConflict {
        kind: &'static str,
        name: String,
        namespace: String,
    },

    /// A resource expected to exist does not.
    #[error("{kind} {name} not found in namespace {namespace}")]
    ResourceNotFound {
        kind: &'static str,
        name: String,
        namespace: String,
    },

    /// A workload carries no recognizable database-type label.
    #[error("workload {name} in namespace {namespace} has no recognizable database type")]
    UnknownDatabaseType { name: String, namespace: String },

    /// The routing API is not installed; provisioning fails closed rather
    /// than leaving a database reachable without its route.
    #[error("routing API (traefik.io/v1alpha1) is unavailable")]
    RoutingUnavailable,

    /// A provisioning step failed. Everything created by earlier steps is
    /// left in place.
    #[error("step {step} failed for database {database} in namespace {namespace}")]
    StepFailed {
        step: ProvisionStep,
        database: String,
        namespace: String,
        #[source]
        source: Box<Error>,
    },

    /// Any other Kubernetes API failure.
    #[error("kubernetes api request failed")]
    Kube(#[from] kube::Error),
}

impl Error {
    /// Classify a create failure: 409 becomes a caller-visible conflict.
    pub fn from_create(kind: &'static str, name: &str, namespace: &str, err: kube::Error) -> Self {
        if is_api_status(&err, 409) {
            Error::ResourceConflict {
                kind,
                name: name.to_string(),
                namespace: namespace.to_string(),
            }
        } else {
            Error::Kube(err)
        }
    }

    /// Attach the provisioning step a failure occurred at.
    pub fn at_step(self, step: ProvisionStep, database: &str, namespace: &str) -> Self {
        Error::StepFailed {
            step,
            database: database.to_string(),
            namespace: namespace.to_string(),
            source: Box::new(self),
        }
    }

    pub fn is_conflict(&self) -> bool {
        match self {
            Error::ResourceConflict { .. } => true,
            Error::StepFailed { source, .. } => source.is_conflict(),
            Error::Kube(err) => is_api_status(err, 409),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Error::ResourceNotFound { .. } => true,
            Error::Kube(err) => is_api_status(err, 404),
            _ => false,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Error::InvalidRequest(_))
    }
}

/// True when the underlying API response carries the given status code.
pub fn is_api_status(err: &kube::Error, code: u16) -> bool {
    matches!(err, kube::Error::Api(ErrorResponse { code: c, .. }) if *c == code)
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
