//! Storage module for the marketplace order service.
//!
//! This module provides the persistence abstraction for order records,
//! supporting different backend implementations such as in-memory or
//! file-based storage.

use async_trait::async_trait;
use market_types::{Order, OrderDraft, OrderStatus};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
	/// Error that occurs when a requested order is not found.
	#[error("Not found")]
	NotFound,
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for order store backends.
///
/// The store is the sole owner of persisted order records, addressable by
/// integer id. Ids are assigned by the store on insert and are unique for
/// the lifetime of the store. Backends guard their own state; callers get
/// single-record read-modify-write atomicity and nothing stronger, so
/// concurrent status updates to the same order are last-write-wins.
#[async_trait]
pub trait OrderStore: Send + Sync {
	/// Persists a draft, assigning it the next free id.
	/// Returns the full record including the assigned id.
	async fn insert(&self, draft: OrderDraft) -> Result<Order, StoreError>;

	/// Retrieves the order with the given id.
	async fn get(&self, id: i64) -> Result<Order, StoreError>;

	/// Returns all orders owned by the given user, most recent first
	/// (creation time descending, ties broken by id descending).
	async fn list_by_user(&self, user_id: &str) -> Result<Vec<Order>, StoreError>;

	/// Replaces the status of an existing order, leaving every other
	/// field untouched. Returns the updated record.
	async fn update_status(&self, id: i64, status: OrderStatus) -> Result<Order, StoreError>;
}

/// Type alias for store factory functions.
///
/// This is the function signature that all store implementations must
/// provide to create instances from their TOML configuration table.
pub type StoreFactory = fn(&toml::Value) -> Result<Box<dyn OrderStore>, StoreError>;

/// Get all registered store implementations.
///
/// Returns a vector of (name, factory) tuples for all available store
/// implementations. The service binary resolves the configured backend
/// name against this list.
pub fn get_all_implementations() -> Vec<(&'static str, StoreFactory)> {
	use implementations::{file, memory};

	vec![
		("file", file::create_store as StoreFactory),
		("memory", memory::create_store as StoreFactory),
	]
}

/// Sorts orders most recent first, ties broken by id descending.
///
/// Shared by backends so that listing order is identical regardless of
/// which implementation is configured.
pub fn sort_most_recent_first(orders: &mut [Order]) {
	orders.sort_by(|a, b| {
		b.created_at
			.cmp(&a.created_at)
			.then_with(|| b.id.cmp(&a.id))
	});
}
