//! Sales against target, per agent.

use std::collections::HashMap;

use crate::{Agent, Order, Scope, Snapshot};

use super::{MonthlyTotal, UNKNOWN_AGENT, monthly_revenue};

/// Percentage of target reached, rounded half-up and capped at 100.
///
/// The cap is for display only; use `sales >= target` to decide whether the
/// target was met.
#[must_use]
pub fn performance_percentage(sales: f64, target: f64) -> i64 {
    let percentage = (sales / target * 100.0 + 0.5).floor();
    percentage.min(100.0) as i64
}

#[derive(Clone, Debug, PartialEq)]
pub struct AgentPerformance {
    /// Store key of the agent.
    pub agent_key: String,
    /// Human-readable `BIGD` code.
    pub code: String,
    pub name: String,
    pub sales: f64,
    pub target: f64,
    pub percentage: i64,
    pub met_target: bool,
}

impl AgentPerformance {
    fn new(agent: &Agent, sales: f64) -> Self {
        let target = agent.sales_target;
        Self {
            agent_key: agent.id.clone(),
            code: agent.agent_id.clone(),
            name: display_name(agent),
            sales,
            target,
            percentage: performance_percentage(sales, target),
            met_target: sales >= target,
        }
    }
}

fn display_name(agent: &Agent) -> String {
    if agent.name.trim().is_empty() {
        UNKNOWN_AGENT.to_string()
    } else {
        agent.name.clone()
    }
}

/// One row per agent visible in `scope`, in collection order.
///
/// Sales are attributed through `order.agent_id`, which holds the agent's
/// store key.
pub fn agent_performance(agents: &[Agent], orders: &[Order], scope: &Scope) -> Vec<AgentPerformance> {
    let mut sales: HashMap<&str, f64> = HashMap::new();
    for order in orders.iter().filter(|o| !o.agent_id.is_empty()) {
        *sales.entry(order.agent_id.as_str()).or_default() += order.total_amount;
    }

    agents
        .iter()
        .filter(|agent| scope.includes(&agent.id))
        .map(|agent| {
            let agent_sales = sales.get(agent.id.as_str()).copied().unwrap_or(0.0);
            AgentPerformance::new(agent, agent_sales)
        })
        .collect()
}

/// Everything the agent detail page shows about one agent.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentDetail {
    pub performance: AgentPerformance,
    pub order_count: usize,
    pub customer_count: usize,
    pub monthly: Vec<MonthlyTotal>,
}

/// Detail for the agent with store key `agent_key`, `None` if absent.
pub fn agent_detail(snapshot: &Snapshot, agent_key: &str) -> Option<AgentDetail> {
    let agent = snapshot.agent(agent_key)?;
    let scope = Scope::Agent(agent.id.clone());

    let own_orders = snapshot.orders.iter().filter(|o| o.agent_id == agent.id);
    let (order_count, sales) = own_orders.fold((0, 0.0), |(count, sum), order| {
        (count + 1, sum + order.total_amount)
    });
    let customer_count = snapshot
        .customers
        .iter()
        .filter(|c| c.agent_id == agent.id)
        .count();

    Some(AgentDetail {
        performance: AgentPerformance::new(agent, sales),
        order_count,
        customer_count,
        monthly: monthly_revenue(&snapshot.orders, &scope, None),
    })
}
