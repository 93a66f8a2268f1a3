//! PostgreSQL-backed user store
//!
//! The store is optional at runtime. When the control database is not
//! reachable the provisioning API still works; only registration, login, and
//! the user CRUD endpoints report the store as unavailable.

pub mod auth;
pub mod client;

pub use auth::{authenticate, hash_password, AuthUser, LoginRequest, RegisterRequest};
pub use client::{DatabaseRecord, Store, StoreError};
