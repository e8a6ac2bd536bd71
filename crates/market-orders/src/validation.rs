//! Payload validation for order placement.
//!
//! The placement payload arrives as raw JSON rather than a typed request
//! struct so that a wrong-typed or missing field reports its specific
//! error code instead of a generic deserialization failure. Checks run in
//! a fixed order and the first failing check determines the reported
//! error.

use crate::OrderError;
use market_types::ShippingInfo;
use serde_json::Value;

/// A placement payload that has passed every validation rule.
#[derive(Debug, Clone)]
pub struct ValidatedOrder {
	pub items: Vec<Value>,
	pub total_price: f64,
	pub total_quantity: i64,
	pub shipping_info: ShippingInfo,
}

/// Validates a raw order placement payload.
///
/// Check order (first failure wins): items, totalPrice, totalQuantity,
/// shippingInfo presence, then each shipping field in declaration order.
/// Shipping strings come back trimmed.
pub fn validate_order_payload(payload: &Value) -> Result<ValidatedOrder, OrderError> {
	let items = payload
		.get("items")
		.and_then(Value::as_array)
		.filter(|items| !items.is_empty())
		.ok_or(OrderError::InvalidItems)?
		.clone();

	let total_price = payload
		.get("totalPrice")
		.and_then(Value::as_f64)
		.filter(|price| *price > 0.0)
		.ok_or(OrderError::InvalidTotalPrice)?;

	let total_quantity = payload
		.get("totalQuantity")
		.and_then(Value::as_i64)
		.filter(|quantity| *quantity > 0)
		.ok_or(OrderError::InvalidTotalQuantity)?;

	let shipping = payload
		.get("shippingInfo")
		.and_then(Value::as_object)
		.ok_or(OrderError::MissingShippingInfo)?;

	let shipping_info = ShippingInfo {
		full_name: shipping_field(shipping, "fullName", OrderError::MissingFullName)?,
		phone: shipping_field(shipping, "phone", OrderError::MissingPhone)?,
		address: shipping_field(shipping, "address", OrderError::MissingAddress)?,
		country: shipping_field(shipping, "country", OrderError::MissingCountry)?,
		city: shipping_field(shipping, "city", OrderError::MissingCity)?,
	};

	Ok(ValidatedOrder {
		items,
		total_price,
		total_quantity,
		shipping_info,
	})
}

/// Extracts a required shipping field as a trimmed non-empty string.
fn shipping_field(
	shipping: &serde_json::Map<String, Value>,
	field: &str,
	missing: OrderError,
) -> Result<String, OrderError> {
	shipping
		.get(field)
		.and_then(Value::as_str)
		.map(str::trim)
		.filter(|value| !value.is_empty())
		.map(str::to_string)
		.ok_or(missing)
}
