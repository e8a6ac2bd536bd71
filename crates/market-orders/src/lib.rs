//! Order lifecycle core for the marketplace service.
//!
//! This crate implements order placement, ownership-scoped retrieval and
//! listing, and status transition over a pluggable [`OrderStore`]. It
//! knows nothing about HTTP: the caller identity arrives as an explicit
//! parameter on every operation (never ambient state), and errors carry
//! stable codes that the service layer maps to status codes.

pub mod validation;

use chrono::Utc;
use market_storage::{OrderStore, StoreError};
use market_types::{Order, OrderDraft, OrderStatus};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that can occur during order operations.
///
/// Each variant maps 1:1 to a wire error code via [`OrderError::code`].
/// The Display message is the human-readable half of the error body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
	#[error("Authentication required")]
	Unauthorized,
	#[error("Valid order ID is required")]
	InvalidId,
	#[error("Items must be a non-empty array")]
	InvalidItems,
	#[error("Total price must be a positive number")]
	InvalidTotalPrice,
	#[error("Total quantity must be a positive number")]
	InvalidTotalQuantity,
	#[error("Shipping info is required")]
	MissingShippingInfo,
	#[error("Shipping info must include fullName")]
	MissingFullName,
	#[error("Shipping info must include phone")]
	MissingPhone,
	#[error("Shipping info must include address")]
	MissingAddress,
	#[error("Shipping info must include country")]
	MissingCountry,
	#[error("Shipping info must include city")]
	MissingCity,
	#[error("Order not found")]
	NotFound,
	#[error("You do not have permission to access this order")]
	Forbidden,
	#[error("Status is required")]
	MissingStatus,
	#[error("Invalid status. Must be one of: pending, processing, shipped, delivered, cancelled")]
	InvalidStatus,
	#[error("Failed to update order")]
	UpdateFailed,
	#[error("Internal server error: {0}")]
	Internal(String),
}

impl OrderError {
	/// Returns the stable wire code for this error.
	pub fn code(&self) -> &'static str {
		match self {
			OrderError::Unauthorized => "UNAUTHORIZED",
			OrderError::InvalidId => "INVALID_ID",
			OrderError::InvalidItems => "INVALID_ITEMS",
			OrderError::InvalidTotalPrice => "INVALID_TOTAL_PRICE",
			OrderError::InvalidTotalQuantity => "INVALID_TOTAL_QUANTITY",
			OrderError::MissingShippingInfo => "MISSING_SHIPPING_INFO",
			OrderError::MissingFullName => "MISSING_FULL_NAME",
			OrderError::MissingPhone => "MISSING_PHONE",
			OrderError::MissingAddress => "MISSING_ADDRESS",
			OrderError::MissingCountry => "MISSING_COUNTRY",
			OrderError::MissingCity => "MISSING_CITY",
			OrderError::NotFound => "ORDER_NOT_FOUND",
			OrderError::Forbidden => "FORBIDDEN",
			OrderError::MissingStatus => "MISSING_STATUS",
			OrderError::InvalidStatus => "INVALID_STATUS",
			OrderError::UpdateFailed => "UPDATE_FAILED",
			OrderError::Internal(_) => "SERVER_ERROR",
		}
	}
}

/// The order service.
///
/// Stateless across calls: every operation reads through to the store,
/// and concurrent updates to the same order are last-write-wins at the
/// storage layer.
pub struct OrderService {
	store: Arc<dyn OrderStore>,
}

impl OrderService {
	/// Creates a new OrderService backed by the given store.
	pub fn new(store: Arc<dyn OrderStore>) -> Self {
		Self { store }
	}

	/// Places a new order for the calling user.
	///
	/// The payload is validated field by field in a fixed order (see
	/// [`validation::validate_order_payload`]); nothing is persisted on
	/// any validation failure. On success the order is stored with
	/// status `pending`, the caller as owner, and trimmed shipping
	/// fields, and the persisted record including its assigned id is
	/// returned.
	pub async fn place_order(
		&self,
		caller: Option<&str>,
		payload: &Value,
	) -> Result<Order, OrderError> {
		let user_id = require_caller(caller)?;
		let validated = validation::validate_order_payload(payload)?;

		let draft = OrderDraft {
			user_id: user_id.to_string(),
			items: validated.items,
			total_price: validated.total_price,
			total_quantity: validated.total_quantity,
			shipping_info: validated.shipping_info,
			status: OrderStatus::Pending,
			created_at: Utc::now(),
		};

		let order = self.store.insert(draft).await.map_err(storage_error)?;
		info!(order_id = order.id, "order placed");
		Ok(order)
	}

	/// Retrieves a single order, enforcing strict ownership.
	///
	/// Existence is checked before ownership: a nonexistent order yields
	/// `NotFound` for any caller, while an existing order owned by
	/// someone else yields `Forbidden`. Two users can never observe each
	/// other's orders through this path, regardless of guessed ids.
	pub async fn get_order(&self, caller: Option<&str>, raw_id: &str) -> Result<Order, OrderError> {
		let user_id = require_caller(caller)?;
		let order_id = parse_order_id(raw_id)?;

		let order = match self.store.get(order_id).await {
			Ok(order) => order,
			Err(StoreError::NotFound) => return Err(OrderError::NotFound),
			Err(e) => return Err(storage_error(e)),
		};

		if order.user_id != user_id {
			debug!(order_id, "order access denied: not the owner");
			return Err(OrderError::Forbidden);
		}
		Ok(order)
	}

	/// Lists the calling user's orders, most recent first.
	///
	/// Never an error for a caller with no orders: the result is simply
	/// empty.
	pub async fn list_orders(&self, caller: Option<&str>) -> Result<Vec<Order>, OrderError> {
		let user_id = require_caller(caller)?;
		self.store
			.list_by_user(user_id)
			.await
			.map_err(storage_error)
	}

	/// Updates the status of an order owned by the calling user.
	///
	/// The new status only has to be a member of the five-value
	/// vocabulary; any state may move to any other state. Checks run in
	/// order: caller, id, status presence, status validity, existence,
	/// ownership. Only the status field is persisted.
	pub async fn update_status(
		&self,
		caller: Option<&str>,
		raw_id: &str,
		body: &Value,
	) -> Result<Order, OrderError> {
		let user_id = require_caller(caller)?;
		let order_id = parse_order_id(raw_id)?;
		let status = parse_status(body)?;

		let existing = match self.store.get(order_id).await {
			Ok(order) => order,
			Err(StoreError::NotFound) => return Err(OrderError::NotFound),
			Err(e) => return Err(storage_error(e)),
		};

		if existing.user_id != user_id {
			debug!(order_id, "order update denied: not the owner");
			return Err(OrderError::Forbidden);
		}

		let updated = match self.store.update_status(order_id, status).await {
			Ok(order) => order,
			// The order vanished between the ownership check and the
			// write; report it as a failed update, not a missing order.
			Err(StoreError::NotFound) => return Err(OrderError::UpdateFailed),
			Err(e) => return Err(storage_error(e)),
		};

		info!(order_id, status = %status, "order status updated");
		Ok(updated)
	}
}

/// Resolves the caller identity or rejects the call as unauthenticated.
fn require_caller(caller: Option<&str>) -> Result<&str, OrderError> {
	caller.ok_or(OrderError::Unauthorized)
}

/// Parses a raw path segment into a positive order id.
fn parse_order_id(raw_id: &str) -> Result<i64, OrderError> {
	raw_id
		.trim()
		.parse::<i64>()
		.ok()
		.filter(|id| *id > 0)
		.ok_or(OrderError::InvalidId)
}

/// Extracts and validates the `status` field of an update body.
fn parse_status(body: &Value) -> Result<OrderStatus, OrderError> {
	match body.get("status") {
		None | Some(Value::Null) => Err(OrderError::MissingStatus),
		Some(Value::String(s)) if s.is_empty() => Err(OrderError::MissingStatus),
		Some(Value::String(s)) => s.parse().map_err(|_| OrderError::InvalidStatus),
		Some(_) => Err(OrderError::InvalidStatus),
	}
}

/// Maps an unexpected storage failure to a server error, logging it once.
fn storage_error(err: StoreError) -> OrderError {
	error!("storage operation failed: {}", err);
	OrderError::Internal(err.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use market_storage::implementations::memory::MemoryStore;
	use serde_json::json;

	fn service() -> OrderService {
		OrderService::new(Arc::new(MemoryStore::new()))
	}

	fn payload() -> Value {
		json!({
			"items": [{"productId": 1, "name": "Bowl", "price": 450, "quantity": 2, "image": "x.jpg"}],
			"totalPrice": 900,
			"totalQuantity": 2,
			"shippingInfo": {
				"fullName": "Jane Doe",
				"phone": "555-0100",
				"address": "12 Hill Road",
				"country": "IN",
				"city": "Jaipur"
			}
		})
	}

	#[tokio::test]
	async fn placing_an_order_persists_it_as_pending() {
		let service = service();
		let order = service.place_order(Some("user_a"), &payload()).await.unwrap();

		assert_eq!(order.status, OrderStatus::Pending);
		assert_eq!(order.user_id, "user_a");
		assert_eq!(order.total_price, 900.0);
		assert!(order.id > 0);

		let fetched = service
			.get_order(Some("user_a"), &order.id.to_string())
			.await
			.unwrap();
		assert_eq!(fetched.id, order.id);
	}

	#[tokio::test]
	async fn anonymous_callers_are_rejected_everywhere() {
		let service = service();
		assert_eq!(
			service.place_order(None, &payload()).await.unwrap_err(),
			OrderError::Unauthorized
		);
		assert_eq!(
			service.get_order(None, "1").await.unwrap_err(),
			OrderError::Unauthorized
		);
		assert_eq!(
			service.list_orders(None).await.unwrap_err(),
			OrderError::Unauthorized
		);
		assert_eq!(
			service
				.update_status(None, "1", &json!({"status": "shipped"}))
				.await
				.unwrap_err(),
			OrderError::Unauthorized
		);
	}

	#[tokio::test]
	async fn validation_failure_persists_nothing() {
		let service = service();
		let mut bad = payload();
		bad["totalPrice"] = json!(-1);

		let err = service.place_order(Some("user_a"), &bad).await.unwrap_err();
		assert_eq!(err, OrderError::InvalidTotalPrice);
		assert!(service.list_orders(Some("user_a")).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn shipping_fields_are_trimmed_before_persisting() {
		let service = service();
		let mut padded = payload();
		padded["shippingInfo"]["fullName"] = json!("  Jane Doe  ");

		let order = service.place_order(Some("user_a"), &padded).await.unwrap();
		assert_eq!(order.shipping_info.full_name, "Jane Doe");
	}

	#[tokio::test]
	async fn owners_never_see_each_others_orders() {
		let service = service();
		let order = service.place_order(Some("user_a"), &payload()).await.unwrap();

		let err = service
			.get_order(Some("user_b"), &order.id.to_string())
			.await
			.unwrap_err();
		assert_eq!(err, OrderError::Forbidden);

		let err = service
			.update_status(
				Some("user_b"),
				&order.id.to_string(),
				&json!({"status": "cancelled"}),
			)
			.await
			.unwrap_err();
		assert_eq!(err, OrderError::Forbidden);
	}

	#[tokio::test]
	async fn nonexistent_orders_are_not_found_before_ownership() {
		let service = service();
		let err = service.get_order(Some("anyone"), "999").await.unwrap_err();
		assert_eq!(err, OrderError::NotFound);
	}

	#[tokio::test]
	async fn malformed_ids_are_rejected() {
		let service = service();
		for raw in ["abc", "0", "-3", "1.5", ""] {
			let err = service.get_order(Some("user_a"), raw).await.unwrap_err();
			assert_eq!(err, OrderError::InvalidId, "raw id {:?}", raw);
		}
	}

	#[tokio::test]
	async fn listing_is_scoped_and_idempotent() {
		let service = service();
		service.place_order(Some("user_a"), &payload()).await.unwrap();
		service.place_order(Some("user_b"), &payload()).await.unwrap();
		service.place_order(Some("user_a"), &payload()).await.unwrap();

		let first = service.list_orders(Some("user_a")).await.unwrap();
		let second = service.list_orders(Some("user_a")).await.unwrap();

		assert_eq!(first.len(), 2);
		assert!(first.iter().all(|o| o.user_id == "user_a"));
		let ids: Vec<i64> = first.iter().map(|o| o.id).collect();
		let ids_again: Vec<i64> = second.iter().map(|o| o.id).collect();
		assert_eq!(ids, ids_again);
	}

	#[tokio::test]
	async fn any_status_may_move_to_any_other() {
		let service = service();
		let order = service.place_order(Some("user_a"), &payload()).await.unwrap();
		let id = order.id.to_string();

		let cancelled = service
			.update_status(Some("user_a"), &id, &json!({"status": "cancelled"}))
			.await
			.unwrap();
		assert_eq!(cancelled.status, OrderStatus::Cancelled);

		// Even a terminal-looking state can move back.
		let reopened = service
			.update_status(Some("user_a"), &id, &json!({"status": "pending"}))
			.await
			.unwrap();
		assert_eq!(reopened.status, OrderStatus::Pending);
	}

	#[tokio::test]
	async fn update_leaves_other_fields_untouched() {
		let service = service();
		let order = service.place_order(Some("user_a"), &payload()).await.unwrap();

		let updated = service
			.update_status(
				Some("user_a"),
				&order.id.to_string(),
				&json!({"status": "shipped"}),
			)
			.await
			.unwrap();

		assert_eq!(updated.status, OrderStatus::Shipped);
		assert_eq!(updated.items, order.items);
		assert_eq!(updated.total_price, order.total_price);
		assert_eq!(updated.shipping_info, order.shipping_info);
		assert_eq!(updated.created_at, order.created_at);
	}

	#[tokio::test]
	async fn status_body_errors_are_distinguished() {
		let service = service();
		let order = service.place_order(Some("user_a"), &payload()).await.unwrap();
		let id = order.id.to_string();

		for body in [json!({}), json!({"status": null}), json!({"status": ""})] {
			let err = service
				.update_status(Some("user_a"), &id, &body)
				.await
				.unwrap_err();
			assert_eq!(err, OrderError::MissingStatus, "body {}", body);
		}

		for body in [json!({"status": "shipped-fast"}), json!({"status": 5})] {
			let err = service
				.update_status(Some("user_a"), &id, &body)
				.await
				.unwrap_err();
			assert_eq!(err, OrderError::InvalidStatus, "body {}", body);
		}
	}

	#[tokio::test]
	async fn status_checks_precede_existence_checks() {
		// A bad status on a nonexistent order reports the status error:
		// input validation runs before the store is consulted.
		let service = service();
		let err = service
			.update_status(Some("user_a"), "999", &json!({"status": "nope"}))
			.await
			.unwrap_err();
		assert_eq!(err, OrderError::InvalidStatus);
	}
}
