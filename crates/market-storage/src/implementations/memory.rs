//! In-memory order store implementation for the marketplace service.
//!
//! This module provides a memory-based implementation of the OrderStore
//! trait, useful for testing and development scenarios where persistence
//! is not required.

use crate::{sort_most_recent_first, OrderStore, StoreError};
use async_trait::async_trait;
use market_types::{Order, OrderDraft, OrderStatus};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory order store.
///
/// Orders live in a HashMap behind a read-write lock, providing fast
/// access but no persistence across restarts. Ids are assigned from a
/// monotonic counter starting at 1.
pub struct MemoryStore {
	inner: RwLock<Inner>,
}

struct Inner {
	orders: HashMap<i64, Order>,
	next_id: i64,
}

impl MemoryStore {
	/// Creates a new empty MemoryStore instance.
	pub fn new() -> Self {
		Self {
			inner: RwLock::new(Inner {
				orders: HashMap::new(),
				next_id: 1,
			}),
		}
	}
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl OrderStore for MemoryStore {
	async fn insert(&self, draft: OrderDraft) -> Result<Order, StoreError> {
		let mut inner = self.inner.write().await;
		let id = inner.next_id;
		inner.next_id += 1;

		let order = draft.into_order(id);
		inner.orders.insert(id, order.clone());
		Ok(order)
	}

	async fn get(&self, id: i64) -> Result<Order, StoreError> {
		let inner = self.inner.read().await;
		inner.orders.get(&id).cloned().ok_or(StoreError::NotFound)
	}

	async fn list_by_user(&self, user_id: &str) -> Result<Vec<Order>, StoreError> {
		let inner = self.inner.read().await;
		let mut orders: Vec<Order> = inner
			.orders
			.values()
			.filter(|order| order.user_id == user_id)
			.cloned()
			.collect();
		sort_most_recent_first(&mut orders);
		Ok(orders)
	}

	async fn update_status(&self, id: i64, status: OrderStatus) -> Result<Order, StoreError> {
		let mut inner = self.inner.write().await;
		let order = inner.orders.get_mut(&id).ok_or(StoreError::NotFound)?;
		order.status = status;
		Ok(order.clone())
	}
}

/// Factory function to create a memory store from configuration.
///
/// Configuration parameters:
/// - None required for memory storage
pub fn create_store(_config: &toml::Value) -> Result<Box<dyn OrderStore>, StoreError> {
	Ok(Box::new(MemoryStore::new()))
}
