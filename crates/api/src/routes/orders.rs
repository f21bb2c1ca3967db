//! Order placement, inspection, status update, and removal endpoints.

use std::sync::Arc;

use audit::AuditSink;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use common::{OrderId, ProductId, UserId};
use domain::{Money, Order, OrderStatus};
use ordering::{OrderingService, PlaceOrder, RequestedItem};
use serde::{Deserialize, Serialize};
use store::Store;
use uuid::Uuid;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Store, A: AuditSink> {
    pub service: OrderingService<S, A>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub total_cents: i64,
}

#[derive(Deserialize)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
    pub total_cents: i64,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id.to_string(),
            user_id: order.user_id.to_string(),
            status: order.status.to_string(),
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id.to_string(),
                    name: item.name,
                    quantity: item.quantity,
                    unit_price_cents: item.unit_price.cents(),
                })
                .collect(),
            total_cents: order.total.cents(),
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

/// Pulls the acting user out of the `x-user-id` header.
///
/// Authentication and authorization happen at the gateway in front of this
/// service; the header is trusted as handed in.
fn actor_from_headers(headers: &HeaderMap) -> Result<UserId, ApiError> {
    let raw = headers
        .get("x-user-id")
        .ok_or_else(|| ApiError::BadRequest("missing x-user-id header".to_string()))?
        .to_str()
        .map_err(|_| ApiError::BadRequest("invalid x-user-id header".to_string()))?;

    let uuid = Uuid::parse_str(raw)
        .map_err(|e| ApiError::BadRequest(format!("invalid x-user-id header: {e}")))?;
    Ok(UserId::from_uuid(uuid))
}

// -- Handlers --

/// POST /orders — place an order for the acting user.
#[tracing::instrument(skip(state, headers, req))]
pub async fn place<S: Store + 'static, A: AuditSink + 'static>(
    State(state): State<Arc<AppState<S, A>>>,
    headers: HeaderMap,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let actor = actor_from_headers(&headers)?;

    let items = req
        .items
        .into_iter()
        .map(|item| RequestedItem::new(ProductId::from_uuid(item.product_id), item.quantity))
        .collect();
    let request = PlaceOrder::new(actor, items, Money::from_cents(req.total_cents));

    let order = state.service.place_order(request).await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders/:id — load an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store + 'static, A: AuditSink + 'static>(
    State(state): State<Arc<AppState<S, A>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.service.get_order(OrderId::from_uuid(id)).await?;
    Ok(Json(order.into()))
}

/// PUT /orders/:id/status — update an order's status.
#[tracing::instrument(skip(state, headers, req))]
pub async fn update_status<S: Store + 'static, A: AuditSink + 'static>(
    State(state): State<Arc<AppState<S, A>>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let status: OrderStatus = req
        .status
        .parse()
        .map_err(|e: domain::ParseStatusError| ApiError::BadRequest(e.to_string()))?;

    let order = state
        .service
        .update_status(OrderId::from_uuid(id), status, actor)
        .await?;
    Ok(Json(order.into()))
}

/// DELETE /orders/:id — remove an order, restoring stock unless delivered.
#[tracing::instrument(skip(state, headers))]
pub async fn remove<S: Store + 'static, A: AuditSink + 'static>(
    State(state): State<Arc<AppState<S, A>>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let actor = actor_from_headers(&headers)?;
    state
        .service
        .remove_order(OrderId::from_uuid(id), actor)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
