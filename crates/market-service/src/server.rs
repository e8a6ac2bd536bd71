//! HTTP server for the marketplace order API.
//!
//! This module builds the axum router, maps order service errors to
//! status codes, and hosts the four order endpoints plus a liveness
//! probe. Handlers are thin: each one resolves the caller identity,
//! delegates to the order service, and serializes the outcome.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	response::{IntoResponse, Json, Response},
	routing::get,
	Router,
};
use market_config::ServerConfig;
use market_orders::{OrderError, OrderService};
use market_types::ErrorBody;
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::identity::Identity;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// The order lifecycle core handling all four operations.
	pub orders: Arc<OrderService>,
}

/// Builds the API router over the given state.
///
/// Kept separate from socket binding so integration tests can drive the
/// router in-process via `tower::ServiceExt::oneshot`.
pub fn build_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(handle_health))
		.route(
			"/orders",
			axum::routing::post(handle_place_order).get(handle_list_orders),
		)
		.route(
			"/orders/{id}",
			get(handle_get_order).patch(handle_update_status),
		)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

/// Starts the HTTP server for the order API.
pub async fn start_server(
	server_config: ServerConfig,
	orders: Arc<OrderService>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = build_router(AppState { orders });

	let bind_address = format!("{}:{}", server_config.host, server_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Marketplace order API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Handles GET /health requests.
async fn handle_health() -> Json<Value> {
	Json(serde_json::json!({"status": "ok"}))
}

/// Handles POST /orders requests.
///
/// Creates a new order for the authenticated caller. Validation failures
/// come back as 400 with a field-specific code; success is 201 with the
/// persisted record.
async fn handle_place_order(
	State(state): State<AppState>,
	identity: Identity,
	body: Result<Json<Value>, JsonRejection>,
) -> Response {
	let payload = match parse_body(body) {
		Ok(payload) => payload,
		Err(response) => return response,
	};

	match state.orders.place_order(identity.as_deref(), &payload).await {
		Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
		Err(e) => error_response(&e),
	}
}

/// Handles GET /orders requests.
///
/// Lists the authenticated caller's own orders, most recent first.
async fn handle_list_orders(State(state): State<AppState>, identity: Identity) -> Response {
	match state.orders.list_orders(identity.as_deref()).await {
		Ok(orders) => (StatusCode::OK, Json(orders)).into_response(),
		Err(e) => error_response(&e),
	}
}

/// Handles GET /orders/{id} requests.
///
/// Retrieves a single order, enforcing strict owner-only access.
async fn handle_get_order(
	State(state): State<AppState>,
	identity: Identity,
	Path(id): Path<String>,
) -> Response {
	match state.orders.get_order(identity.as_deref(), &id).await {
		Ok(order) => (StatusCode::OK, Json(order)).into_response(),
		Err(e) => error_response(&e),
	}
}

/// Handles PATCH /orders/{id} requests.
///
/// Updates the status of an order owned by the caller. Only the status
/// field changes; the updated record is returned.
async fn handle_update_status(
	State(state): State<AppState>,
	identity: Identity,
	Path(id): Path<String>,
	body: Result<Json<Value>, JsonRejection>,
) -> Response {
	let payload = match parse_body(body) {
		Ok(payload) => payload,
		Err(response) => return response,
	};

	match state
		.orders
		.update_status(identity.as_deref(), &id, &payload)
		.await
	{
		Ok(order) => (StatusCode::OK, Json(order)).into_response(),
		Err(e) => error_response(&e),
	}
}

/// Unwraps a JSON body, turning parse failures into a server error
/// response with the underlying message attached.
fn parse_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, Response> {
	match body {
		Ok(Json(payload)) => Ok(payload),
		Err(rejection) => {
			tracing::warn!("Failed to parse request body: {}", rejection.body_text());
			Err(error_response(&OrderError::Internal(rejection.body_text())))
		}
	}
}

/// Maps an order service error to its HTTP response.
fn error_response(err: &OrderError) -> Response {
	let status = match err {
		OrderError::Unauthorized => StatusCode::UNAUTHORIZED,
		OrderError::Forbidden => StatusCode::FORBIDDEN,
		OrderError::NotFound => StatusCode::NOT_FOUND,
		OrderError::UpdateFailed | OrderError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		_ => StatusCode::BAD_REQUEST,
	};

	if status.is_server_error() {
		tracing::error!("Request failed: {}", err);
	} else {
		tracing::debug!("Request rejected: {}", err);
	}

	let body = ErrorBody::new(err.code(), err.to_string());
	(status, Json(body)).into_response()
}
