//! Order endpoints.

use api_types::order::{OrderItem, OrderNew, OrderStatus, OrderUpdate, OrderView, OrdersResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{NewOrder, Order, OrderPatch, Scope};

use crate::{ServerError, server::ServerState};

fn status_view(status: engine::OrderStatus) -> OrderStatus {
    match status {
        engine::OrderStatus::Pending => OrderStatus::Pending,
        engine::OrderStatus::Processing => OrderStatus::Processing,
        engine::OrderStatus::Completed => OrderStatus::Completed,
        engine::OrderStatus::Cancelled => OrderStatus::Cancelled,
        engine::OrderStatus::Unknown => OrderStatus::Unknown,
    }
}

fn status_from_view(status: OrderStatus) -> engine::OrderStatus {
    match status {
        OrderStatus::Pending => engine::OrderStatus::Pending,
        OrderStatus::Processing => engine::OrderStatus::Processing,
        OrderStatus::Completed => engine::OrderStatus::Completed,
        OrderStatus::Cancelled => engine::OrderStatus::Cancelled,
        OrderStatus::Unknown => engine::OrderStatus::Unknown,
    }
}

pub(crate) fn order_view(order: Order) -> OrderView {
    OrderView {
        id: order.id,
        order_id: order.order_id,
        customer_id: order.customer_id,
        customer_name: order.customer_name,
        agent_id: order.agent_id,
        order_date: order.order_date,
        items: order
            .items
            .into_iter()
            .map(|item| OrderItem {
                product_id: item.product_id,
                product_name: item.product_name,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect(),
        total_amount: order.total_amount,
        status: status_view(order.status),
        created_at: order.created_at,
    }
}

pub async fn list(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
) -> Result<Json<OrdersResponse>, ServerError> {
    let orders = state
        .engine
        .orders(&scope)
        .await?
        .into_iter()
        .map(order_view)
        .collect();

    Ok(Json(OrdersResponse { orders }))
}

/// Record an order for the calling agent (or for nobody, from the admin view).
pub async fn order_new(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
    Json(payload): Json<OrderNew>,
) -> Result<(StatusCode, Json<OrderView>), ServerError> {
    let order = state
        .engine
        .create_order(
            NewOrder {
                customer_id: payload.customer_id,
                customer_name: payload.customer_name,
                order_date: payload.order_date,
                status: payload.status.map(status_from_view),
                items: payload
                    .items
                    .into_iter()
                    .map(|item| engine::OrderItem {
                        product_id: item.product_id,
                        product_name: item.product_name,
                        quantity: item.quantity,
                        unit_price: item.unit_price,
                    })
                    .collect(),
            },
            &scope,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(order_view(order))))
}

pub async fn update(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> Result<Json<OrderView>, ServerError> {
    if payload.status.is_none() && payload.order_date.is_none() {
        return Err(ServerError::Generic(
            "provide at least one of status or order_date".to_string(),
        ));
    }

    let order = state
        .engine
        .update_order(
            &id,
            OrderPatch {
                status: payload.status.map(status_from_view),
                order_date: payload.order_date,
            },
            &scope,
        )
        .await?;

    Ok(Json(order_view(order)))
}
