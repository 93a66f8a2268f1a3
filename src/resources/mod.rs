//! Pure generation of Kubernetes resource specs
//!
//! Nothing in this module performs I/O; every function maps a request to the
//! exact object the provisioner will submit. This keeps the shapes unit
//! testable without a cluster.

pub mod admin;
pub mod common;
pub mod database;
pub mod routing;
