//! Dashboard widgets.

use api_types::dashboard::{
    Dashboard, MonthlyQuery, MonthlyResponse, MonthlyRevenue, TopCustomer, TopCustomersResponse,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use engine::{
    Scope,
    reports::{DashboardSummary, MonthlyTotal},
};

use crate::{ServerError, server::ServerState};

pub async fn summary(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
) -> Result<Json<Dashboard>, ServerError> {
    let summary = state.engine.dashboard(&scope).await?;

    Ok(Json(match summary {
        DashboardSummary::Admin(admin) => Dashboard::Admin {
            total_revenue: admin.total_revenue,
            total_customers: admin.total_customers,
            total_orders: admin.total_orders,
            total_agents: admin.total_agents,
            total_products: admin.total_products,
            total_territories: admin.total_territories,
        },
        DashboardSummary::Agent(agent) => Dashboard::Agent {
            total_revenue: agent.total_revenue,
            total_customers: agent.total_customers,
            total_orders: agent.total_orders,
            total_products_sold: agent.total_products_sold,
        },
    }))
}

pub(crate) fn monthly_view(months: Vec<MonthlyTotal>) -> Vec<MonthlyRevenue> {
    months
        .into_iter()
        .map(|month| MonthlyRevenue {
            month: month.month.to_string(),
            total: month.total,
        })
        .collect()
}

/// Revenue per month, for every year unless `?year=` is given.
pub async fn monthly(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<MonthlyResponse>, ServerError> {
    let months = state.engine.monthly_revenue(&scope, query.year).await?;

    Ok(Json(MonthlyResponse {
        months: monthly_view(months),
    }))
}

pub async fn top_customers(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
) -> Result<Json<TopCustomersResponse>, ServerError> {
    let customers = state
        .engine
        .top_customers(&scope)
        .await?
        .into_iter()
        .map(|customer| TopCustomer {
            id: customer.customer_key,
            customer_id: customer.code,
            name: customer.name,
            email: customer.email,
            total_spent: customer.total_spent,
        })
        .collect();

    Ok(Json(TopCustomersResponse { customers }))
}
