//! Scalar rollups shown in the dashboard header cards.

use crate::{Order, Scope, Snapshot};

/// Sum of `total_amount` over the orders visible in `scope`.
pub fn revenue_total(orders: &[Order], scope: &Scope) -> f64 {
    orders
        .iter()
        .filter(|order| scope.includes(&order.agent_id))
        .map(|order| order.total_amount)
        .sum()
}

/// Sum of line-item quantities over the orders visible in `scope`.
pub fn products_sold(orders: &[Order], scope: &Scope) -> f64 {
    orders
        .iter()
        .filter(|order| scope.includes(&order.agent_id))
        .map(Order::quantity)
        .sum()
}

/// Number of records per collection, as visible in a scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntityCounts {
    pub agents: usize,
    pub customers: usize,
    pub orders: usize,
    pub products: usize,
    pub territories: usize,
}

/// Count every collection. Products are shared reference data and are never
/// scoped; everything else is filtered by the owning agent.
pub fn entity_counts(snapshot: &Snapshot, scope: &Scope) -> EntityCounts {
    EntityCounts {
        agents: snapshot
            .agents
            .iter()
            .filter(|agent| scope.includes(&agent.id))
            .count(),
        customers: snapshot
            .customers
            .iter()
            .filter(|customer| scope.includes(&customer.agent_id))
            .count(),
        orders: snapshot
            .orders
            .iter()
            .filter(|order| scope.includes(&order.agent_id))
            .count(),
        products: snapshot.products.len(),
        territories: snapshot
            .territories
            .iter()
            .filter(|territory| scope.includes(&territory.agent_id))
            .count(),
    }
}

/// Header cards of the admin dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AdminSummary {
    pub total_revenue: f64,
    pub total_customers: usize,
    pub total_orders: usize,
    pub total_agents: usize,
    pub total_products: usize,
    pub total_territories: usize,
}

/// Header cards of an agent's own dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AgentSummary {
    pub total_revenue: f64,
    pub total_customers: usize,
    pub total_orders: usize,
    pub total_products_sold: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DashboardSummary {
    Admin(AdminSummary),
    Agent(AgentSummary),
}

/// Dashboard header for `scope`: the admin cards when unrestricted, the
/// agent cards otherwise.
pub fn dashboard_summary(snapshot: &Snapshot, scope: &Scope) -> DashboardSummary {
    let counts = entity_counts(snapshot, scope);
    let total_revenue = revenue_total(&snapshot.orders, scope);
    match scope {
        Scope::All => DashboardSummary::Admin(AdminSummary {
            total_revenue,
            total_customers: counts.customers,
            total_orders: counts.orders,
            total_agents: counts.agents,
            total_products: counts.products,
            total_territories: counts.territories,
        }),
        Scope::Agent(_) => DashboardSummary::Agent(AgentSummary {
            total_revenue,
            total_customers: counts.customers,
            total_orders: counts.orders,
            total_products_sold: products_sold(&snapshot.orders, scope),
        }),
    }
}
