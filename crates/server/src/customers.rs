//! Customer endpoints.

use api_types::{
    code::NextCode,
    customer::{CustomerNew, CustomerStatus, CustomerUpdate, CustomerView, CustomersResponse},
    order::OrdersResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Customer, CustomerPatch, NewCustomer, Scope};

use crate::{ServerError, orders::order_view, server::ServerState};

fn status_view(status: engine::CustomerStatus) -> CustomerStatus {
    match status {
        engine::CustomerStatus::Active => CustomerStatus::Active,
        engine::CustomerStatus::Inactive => CustomerStatus::Inactive,
        engine::CustomerStatus::Blocked => CustomerStatus::Blocked,
        engine::CustomerStatus::Unknown => CustomerStatus::Unknown,
    }
}

fn status_from_view(status: CustomerStatus) -> engine::CustomerStatus {
    match status {
        CustomerStatus::Active => engine::CustomerStatus::Active,
        CustomerStatus::Inactive => engine::CustomerStatus::Inactive,
        CustomerStatus::Blocked => engine::CustomerStatus::Blocked,
        CustomerStatus::Unknown => engine::CustomerStatus::Unknown,
    }
}

fn customer_view(customer: Customer, agent_name: Option<String>) -> CustomerView {
    CustomerView {
        id: customer.id,
        customer_id: customer.customer_id,
        name: customer.name,
        email: customer.email,
        contact: customer.contact,
        location: customer.location,
        agent_id: customer.agent_id,
        agent_name,
        status: status_view(customer.status),
        total_spent: customer.total_spent,
        total_orders: customer.total_orders,
        created_at: customer.created_at,
    }
}

pub async fn list(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
) -> Result<Json<CustomersResponse>, ServerError> {
    let customers = state
        .engine
        .customer_directory(&scope)
        .await?
        .into_iter()
        .map(|listing| customer_view(listing.customer, Some(listing.agent_name)))
        .collect();

    Ok(Json(CustomersResponse { customers }))
}

pub async fn get(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerView>, ServerError> {
    let customer = state.engine.customer(&id, &scope).await?;
    Ok(Json(customer_view(customer, None)))
}

pub async fn next_code(
    State(state): State<ServerState>,
) -> Result<Json<NextCode>, ServerError> {
    let code = state.engine.next_customer_code().await?;
    Ok(Json(NextCode { code }))
}

/// A customer created by an agent belongs to that agent.
pub async fn customer_new(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
    Json(payload): Json<CustomerNew>,
) -> Result<(StatusCode, Json<CustomerView>), ServerError> {
    let agent_id = match scope.agent_id() {
        Some(own) => {
            if let Some(requested) = payload.agent_id.as_deref() {
                scope.ensure_includes(requested)?;
            }
            Some(own.to_string())
        }
        None => payload.agent_id,
    };

    let customer = state
        .engine
        .create_customer(NewCustomer {
            name: payload.name,
            email: payload.email,
            contact: payload.contact,
            location: payload.location,
            agent_id,
            status: payload.status.map(status_from_view),
            latitude: payload.latitude,
            longitude: payload.longitude,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(customer_view(customer, None))))
}

pub async fn update(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CustomerUpdate>,
) -> Result<Json<CustomerView>, ServerError> {
    state.engine.customer(&id, &scope).await?;
    if let Some(agent_id) = payload.agent_id.as_deref() {
        scope.ensure_includes(agent_id)?;
    }

    let customer = state
        .engine
        .update_customer(
            &id,
            CustomerPatch {
                name: payload.name,
                email: payload.email,
                contact: payload.contact,
                location: payload.location,
                agent_id: payload.agent_id,
                status: payload.status.map(status_from_view),
                latitude: payload.latitude,
                longitude: payload.longitude,
            },
        )
        .await?;

    Ok(Json(customer_view(customer, None)))
}

pub async fn delete(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.customer(&id, &scope).await?;
    state.engine.delete_customer(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn orders(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<OrdersResponse>, ServerError> {
    let orders = state
        .engine
        .customer_orders(&id, &scope)
        .await?
        .into_iter()
        .map(order_view)
        .collect();

    Ok(Json(OrdersResponse { orders }))
}
