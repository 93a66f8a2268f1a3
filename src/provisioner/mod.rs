//! Orchestration of provisioning, decommissioning, and listing

pub mod context;
pub mod decommission;
pub mod error;
pub mod list;
pub mod namespace;
pub mod provision;
pub mod step;

pub use context::Context;
pub use decommission::decommission;
pub use error::{Error, Result};
pub use list::{list_databases, list_namespaces};
pub use namespace::ensure_namespace;
pub use provision::provision;
pub use step::ProvisionStep;
