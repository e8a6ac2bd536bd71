//! Common types module for the marketplace order service.
//!
//! This module defines the core data types shared by the storage, order,
//! and HTTP service crates. It provides a centralized location for shared
//! types to ensure consistency across all components.

/// API types for HTTP endpoints and error bodies.
pub mod api;
/// Order domain types including line items, shipping details, and status.
pub mod order;

// Re-export all types for convenient access
pub use api::*;
pub use order::*;
