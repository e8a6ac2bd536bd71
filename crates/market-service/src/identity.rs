//! Caller identity extraction.
//!
//! Authentication itself lives outside this service: an upstream identity
//! provider (session gateway) resolves the buyer's credentials and
//! attaches the resulting user id as the `x-user-id` request header. This
//! extractor only reads that resolved identity; absence means the caller
//! is anonymous and every order operation will reject it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

/// Header carrying the resolved user id of the caller.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The resolved caller identity, or `None` for anonymous requests.
///
/// Extraction is infallible: authorization decisions belong to the order
/// service, not the extractor.
#[derive(Debug, Clone)]
pub struct Identity(pub Option<String>);

impl Identity {
	/// Returns the user id as a borrowed string, if present.
	pub fn as_deref(&self) -> Option<&str> {
		self.0.as_deref()
	}
}

impl<S> FromRequestParts<S> for Identity
where
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let user_id = parts
			.headers
			.get(USER_ID_HEADER)
			.and_then(|value| value.to_str().ok())
			.map(str::trim)
			.filter(|value| !value.is_empty())
			.map(str::to_string);

		Ok(Identity(user_id))
	}
}
