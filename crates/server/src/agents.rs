//! Sales force endpoints.

use api_types::{
    Position,
    agent::{
        Activity, AgentNew, AgentStatus, AgentUpdate, AgentView, AgentsResponse,
        TrackedAgentView, TrackingResponse,
    },
    code::NextCode,
    order::OrdersResponse,
    report::AgentDetailView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Agent, AgentPatch, GeoPoint, NewAgent, Scope, reports};

use crate::{
    ServerError, dashboard::monthly_view, orders::order_view, reports::performance_view,
    server::ServerState,
};

pub(crate) fn position(point: GeoPoint) -> Position {
    Position {
        lat: point.lat,
        lng: point.lng,
    }
}

fn status_view(status: engine::AgentStatus) -> AgentStatus {
    match status {
        engine::AgentStatus::Active => AgentStatus::Active,
        engine::AgentStatus::Inactive => AgentStatus::Inactive,
        engine::AgentStatus::Suspended => AgentStatus::Suspended,
        engine::AgentStatus::Unknown => AgentStatus::Unknown,
    }
}

fn status_from_view(status: AgentStatus) -> engine::AgentStatus {
    match status {
        AgentStatus::Active => engine::AgentStatus::Active,
        AgentStatus::Inactive => engine::AgentStatus::Inactive,
        AgentStatus::Suspended => engine::AgentStatus::Suspended,
        AgentStatus::Unknown => engine::AgentStatus::Unknown,
    }
}

fn agent_view(agent: Agent) -> AgentView {
    AgentView {
        position: agent.coordinates().map(position),
        id: agent.id,
        agent_id: agent.agent_id,
        name: agent.name,
        email: agent.email,
        contact: agent.contact,
        area_covered: agent.area_covered,
        status: status_view(agent.status),
        sales_target: agent.sales_target,
        customers_count: agent.customers_count,
        total_sales: agent.total_sales,
        created_at: agent.created_at,
        last_updated: agent.last_updated,
    }
}

/// Admins see every agent, an agent only itself.
pub async fn list(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
) -> Result<Json<AgentsResponse>, ServerError> {
    let agents = state
        .engine
        .agents()
        .await?
        .into_iter()
        .filter(|agent| scope.includes(&agent.id))
        .map(agent_view)
        .collect();

    Ok(Json(AgentsResponse { agents }))
}

pub async fn get(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<AgentView>, ServerError> {
    let agent = state.engine.agent(&id, &scope).await?;
    Ok(Json(agent_view(agent)))
}

pub async fn next_code(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
) -> Result<Json<NextCode>, ServerError> {
    scope.ensure_admin()?;
    let code = state.engine.next_agent_code().await?;
    Ok(Json(NextCode { code }))
}

pub async fn agent_new(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
    Json(payload): Json<AgentNew>,
) -> Result<(StatusCode, Json<AgentView>), ServerError> {
    scope.ensure_admin()?;
    let agent = state
        .engine
        .create_agent(NewAgent {
            name: payload.name,
            email: payload.email,
            contact: payload.contact,
            area_covered: payload.area_covered,
            status: payload.status.map(status_from_view),
            sales_target: payload.sales_target,
            latitude: payload.latitude,
            longitude: payload.longitude,
            user_id: payload.user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(agent_view(agent))))
}

/// Agents may update their own record (the tracker pushes positions this
/// way) but not their target or status.
pub async fn update(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AgentUpdate>,
) -> Result<Json<AgentView>, ServerError> {
    let agent = state
        .engine
        .update_agent(
            &id,
            AgentPatch {
                name: payload.name,
                email: payload.email,
                contact: payload.contact,
                area_covered: payload.area_covered,
                status: payload.status.map(status_from_view),
                sales_target: payload.sales_target,
                latitude: payload.latitude,
                longitude: payload.longitude,
            },
            &scope,
        )
        .await?;

    Ok(Json(agent_view(agent)))
}

pub async fn delete(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    scope.ensure_admin()?;
    state.engine.delete_agent(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn performance(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<AgentDetailView>, ServerError> {
    let detail = state.engine.agent_detail(&id, &scope).await?;

    Ok(Json(AgentDetailView {
        performance: performance_view(detail.performance),
        order_count: detail.order_count,
        customer_count: detail.customer_count,
        monthly: monthly_view(detail.monthly),
    }))
}

pub async fn orders(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<OrdersResponse>, ServerError> {
    let orders = state
        .engine
        .agent_orders(&id, &scope)
        .await?
        .into_iter()
        .map(order_view)
        .collect();

    Ok(Json(OrdersResponse { orders }))
}

/// Live positions of the whole sales force, from the agents kept fresh by the
/// tracking task. Agents see their teammates on the map too.
pub async fn tracking(
    State(state): State<ServerState>,
) -> Result<Json<TrackingResponse>, ServerError> {
    let agents = state.tracked.read().await;
    let rows = reports::agent_tracking(&agents, Utc::now())
        .into_iter()
        .map(|row| TrackedAgentView {
            id: row.agent_key,
            agent_id: row.code,
            name: row.name,
            contact: row.contact,
            area_covered: row.area_covered,
            position: row.position.map(position),
            last_updated: row.last_updated,
            activity: match row.activity {
                reports::Activity::Active => Activity::Active,
                reports::Activity::Inactive => Activity::Inactive,
            },
            last_seen: row.last_seen,
        })
        .collect();

    Ok(Json(TrackingResponse { agents: rows }))
}
