//! API types for the marketplace order HTTP API.
//!
//! This module defines the error body shared by all endpoints. Success
//! bodies are the order records themselves, serialized directly.

use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint.
///
/// `code` is a stable machine-readable identifier (e.g. `UNAUTHORIZED`,
/// `INVALID_ITEMS`); `error` is the human-readable description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
	/// Human-readable description of the failure.
	pub error: String,
	/// Stable machine-readable error code.
	pub code: String,
}

impl ErrorBody {
	/// Builds an error body from a code and message.
	pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			code: code.into(),
		}
	}
}
