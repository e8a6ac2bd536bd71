//! Order domain types for the marketplace order service.
//!
//! This module defines the persisted order record, the draft record handed
//! to the store at creation time, and the order status vocabulary used
//! throughout the order lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A buyer's order as persisted by the order store.
///
/// The record is created once via order placement and afterwards only its
/// `status` field may change. `user_id` establishes the ownership
/// invariant: an order's owner never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Unique identifier, assigned by the store on creation.
	pub id: i64,
	/// Identifier of the owning user, set at creation, immutable.
	pub user_id: String,
	/// Line items as submitted by the buyer. Each item carries
	/// `{productId, name, price, quantity, image}` by convention; the
	/// order service treats them as opaque beyond being non-empty.
	pub items: Vec<serde_json::Value>,
	/// Order total as supplied by the caller. Not recomputed from items.
	pub total_price: f64,
	/// Total item count as supplied by the caller.
	pub total_quantity: i64,
	/// Delivery destination, all fields trimmed at creation.
	pub shipping_info: ShippingInfo,
	/// Current status of the order.
	pub status: OrderStatus,
	/// Timestamp when this order was created.
	pub created_at: DateTime<Utc>,
}

/// A validated order awaiting persistence.
///
/// Identical to [`Order`] minus the store-assigned id. Produced by the
/// order service after payload validation and consumed by
/// `OrderStore::insert`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
	/// Identifier of the owning user.
	pub user_id: String,
	/// Line items as submitted by the buyer.
	pub items: Vec<serde_json::Value>,
	/// Order total as supplied by the caller.
	pub total_price: f64,
	/// Total item count as supplied by the caller.
	pub total_quantity: i64,
	/// Delivery destination, already trimmed.
	pub shipping_info: ShippingInfo,
	/// Initial status, always `pending` for new orders.
	pub status: OrderStatus,
	/// Creation timestamp.
	pub created_at: DateTime<Utc>,
}

impl OrderDraft {
	/// Materializes the draft into a full order with the given id.
	pub fn into_order(self, id: i64) -> Order {
		Order {
			id,
			user_id: self.user_id,
			items: self.items,
			total_price: self.total_price,
			total_quantity: self.total_quantity,
			shipping_info: self.shipping_info,
			status: self.status,
			created_at: self.created_at,
		}
	}
}

/// Delivery destination for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
	pub full_name: String,
	pub phone: String,
	pub address: String,
	pub country: String,
	pub city: String,
}

/// Status of an order in the marketplace.
///
/// Membership in this set is the only constraint on status transitions:
/// any state may move to any other state, including out of
/// terminal-looking ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
	/// Order has been placed but not yet picked up by the artisan.
	Pending,
	/// Order is being prepared.
	Processing,
	/// Order has been handed to the carrier.
	Shipped,
	/// Order has reached the buyer.
	Delivered,
	/// Order has been cancelled.
	Cancelled,
}

impl OrderStatus {
	/// All valid statuses, in lifecycle order.
	pub const ALL: [OrderStatus; 5] = [
		OrderStatus::Pending,
		OrderStatus::Processing,
		OrderStatus::Shipped,
		OrderStatus::Delivered,
		OrderStatus::Cancelled,
	];

	/// Returns the wire representation of this status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "pending",
			OrderStatus::Processing => "processing",
			OrderStatus::Shipped => "shipped",
			OrderStatus::Delivered => "delivered",
			OrderStatus::Cancelled => "cancelled",
		}
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl FromStr for OrderStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		OrderStatus::ALL
			.into_iter()
			.find(|status| status.as_str() == s)
			.ok_or_else(|| format!("unknown order status: {}", s))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_round_trips_through_wire_form() {
		for status in OrderStatus::ALL {
			assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
		}
		assert!("shipped-fast".parse::<OrderStatus>().is_err());
		assert!("Pending".parse::<OrderStatus>().is_err());
	}

	#[test]
	fn order_serializes_camel_case() {
		let order = Order {
			id: 7,
			user_id: "user_a".into(),
			items: vec![serde_json::json!({"productId": 1})],
			total_price: 900.0,
			total_quantity: 2,
			shipping_info: ShippingInfo {
				full_name: "Jane Doe".into(),
				phone: "555-0100".into(),
				address: "12 Hill Road".into(),
				country: "IN".into(),
				city: "Jaipur".into(),
			},
			status: OrderStatus::Pending,
			created_at: Utc::now(),
		};

		let json = serde_json::to_value(&order).unwrap();
		assert_eq!(json["userId"], "user_a");
		assert_eq!(json["totalPrice"], 900.0);
		assert_eq!(json["status"], "pending");
		assert_eq!(json["shippingInfo"]["fullName"], "Jane Doe");
	}
}
