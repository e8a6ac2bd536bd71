//! File-based order store implementation for the marketplace service.
//!
//! Orders are stored as one JSON document per record under a base
//! directory, alongside a counter file holding the next free id. Writes
//! go through a temp-file-then-rename step so that a crash never leaves a
//! half-written record behind.

use crate::{sort_most_recent_first, OrderStore, StoreError};
use async_trait::async_trait;
use market_types::{Order, OrderDraft, OrderStatus};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

const COUNTER_FILE: &str = "next-id";
const ORDER_PREFIX: &str = "order-";

/// File-based order store.
///
/// Mutating operations serialize through a single mutex; reads go
/// straight to the filesystem. Good enough for a single-process
/// deployment, which is the only one this service targets.
pub struct FileStore {
	/// Base directory path for storing order files.
	base_path: PathBuf,
	/// Guards id assignment and read-modify-write cycles.
	write_lock: Mutex<()>,
}

impl FileStore {
	/// Creates a new FileStore rooted at the given directory.
	///
	/// The directory is created lazily on first write.
	pub fn new(base_path: PathBuf) -> Self {
		Self {
			base_path,
			write_lock: Mutex::new(()),
		}
	}

	fn order_path(&self, id: i64) -> PathBuf {
		self.base_path.join(format!("{}{}.json", ORDER_PREFIX, id))
	}

	/// Reserves the next free id. Caller must hold the write lock.
	async fn reserve_id(&self) -> Result<i64, StoreError> {
		let counter_path = self.base_path.join(COUNTER_FILE);

		let next = match fs::read_to_string(&counter_path).await {
			Ok(raw) => raw
				.trim()
				.parse::<i64>()
				.map_err(|e| StoreError::Backend(format!("corrupt id counter: {}", e)))?,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				// No counter yet: recover from existing order files so a
				// deleted counter never reassigns a live id.
				self.max_existing_id().await? + 1
			}
			Err(e) => return Err(StoreError::Backend(e.to_string())),
		};

		write_atomic(&counter_path, (next + 1).to_string().as_bytes()).await?;
		Ok(next)
	}

	/// Scans the base directory for the highest assigned order id.
	async fn max_existing_id(&self) -> Result<i64, StoreError> {
		let mut max_id = 0;
		let mut entries = match fs::read_dir(&self.base_path).await {
			Ok(entries) => entries,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
			Err(e) => return Err(StoreError::Backend(e.to_string())),
		};

		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?
		{
			if let Some(id) = order_id_from_path(&entry.path()) {
				max_id = max_id.max(id);
			}
		}
		Ok(max_id)
	}

	async fn read_order(&self, id: i64) -> Result<Order, StoreError> {
		let data = match fs::read(self.order_path(id)).await {
			Ok(data) => data,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				return Err(StoreError::NotFound)
			}
			Err(e) => return Err(StoreError::Backend(e.to_string())),
		};
		serde_json::from_slice(&data).map_err(|e| StoreError::Serialization(e.to_string()))
	}

	async fn write_order(&self, order: &Order) -> Result<(), StoreError> {
		fs::create_dir_all(&self.base_path)
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?;

		let bytes = serde_json::to_vec(order)
			.map_err(|e| StoreError::Serialization(e.to_string()))?;
		write_atomic(&self.order_path(order.id), &bytes).await
	}
}

/// Extracts the order id from an `order-{id}.json` file path.
fn order_id_from_path(path: &Path) -> Option<i64> {
	if path.extension() != Some(std::ffi::OsStr::new("json")) {
		return None;
	}
	let stem = path.file_stem()?.to_str()?;
	stem.strip_prefix(ORDER_PREFIX)?.parse::<i64>().ok()
}

/// Writes bytes to a temp file then renames it into place.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
	let temp_path = path.with_extension("tmp");
	fs::write(&temp_path, bytes)
		.await
		.map_err(|e| StoreError::Backend(e.to_string()))?;
	fs::rename(&temp_path, path)
		.await
		.map_err(|e| StoreError::Backend(e.to_string()))
}

#[async_trait]
impl OrderStore for FileStore {
	async fn insert(&self, draft: OrderDraft) -> Result<Order, StoreError> {
		let _guard = self.write_lock.lock().await;

		fs::create_dir_all(&self.base_path)
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?;

		let id = self.reserve_id().await?;
		let order = draft.into_order(id);
		self.write_order(&order).await?;
		Ok(order)
	}

	async fn get(&self, id: i64) -> Result<Order, StoreError> {
		self.read_order(id).await
	}

	async fn list_by_user(&self, user_id: &str) -> Result<Vec<Order>, StoreError> {
		let mut entries = match fs::read_dir(&self.base_path).await {
			Ok(entries) => entries,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(e) => return Err(StoreError::Backend(e.to_string())),
		};

		let mut orders = Vec::new();
		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?
		{
			let path = entry.path();
			if order_id_from_path(&path).is_none() {
				continue;
			}
			match fs::read(&path).await {
				Ok(data) => match serde_json::from_slice::<Order>(&data) {
					Ok(order) if order.user_id == user_id => orders.push(order),
					Ok(_) => {}
					Err(e) => {
						tracing::warn!("Skipping unreadable order file {:?}: {}", path, e);
					}
				},
				Err(e) => {
					tracing::warn!("Skipping order file {:?}: {}", path, e);
				}
			}
		}

		sort_most_recent_first(&mut orders);
		Ok(orders)
	}

	async fn update_status(&self, id: i64, status: OrderStatus) -> Result<Order, StoreError> {
		let _guard = self.write_lock.lock().await;

		let mut order = self.read_order(id).await?;
		order.status = status;
		self.write_order(&order).await?;
		Ok(order)
	}
}

/// Factory function to create a file store from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Base directory for order files (default: "./data/orders")
pub fn create_store(config: &toml::Value) -> Result<Box<dyn OrderStore>, StoreError> {
	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or("./data/orders")
		.to_string();

	Ok(Box::new(FileStore::new(PathBuf::from(storage_path))))
}
