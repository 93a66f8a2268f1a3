//! Per-tenant database provisioning on Kubernetes
//!
//! Provisions isolated MySQL or PostgreSQL instances for tenants, each with
//! its own admin console (phpMyAdmin or pgAdmin) exposed through Traefik
//! under a tenant-scoped path prefix. Tenants are isolated by namespace;
//! every derived name, label, and URL comes from the deterministic formulas
//! in [`naming`].

pub mod config;
pub mod health;
pub mod model;
pub mod naming;
pub mod policy;
pub mod provisioner;
pub mod resources;
pub mod server;
pub mod store;
