//! HTTP service crate for the marketplace order API.
//!
//! Exposes the router construction and identity extraction so that
//! integration tests can drive the service in-process without binding a
//! socket.

/// Caller identity extraction from the upstream identity provider.
pub mod identity;
/// Router construction, request handlers, and error mapping.
pub mod server;
