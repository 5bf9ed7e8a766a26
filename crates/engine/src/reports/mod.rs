//! Rollups computed from a [`Snapshot`].
//!
//! Everything in here is a pure function of the records it is handed plus an
//! explicit [`Scope`]. Nothing is cached or written back; callers recompute
//! from a fresh snapshot every time (including on every emission of a live
//! subscription).

use crate::{Scope, Snapshot};

mod directory;
mod monthly;
mod performance;
mod rankings;
mod totals;
mod tracking;

pub use directory::{
    CustomerListing, OrderOwner, agent_name, customer_directory, order_history, scoped_orders,
};
pub use monthly::{MONTH_NAMES, MonthlyTotal, monthly_revenue};
pub use performance::{
    AgentDetail, AgentPerformance, agent_detail, agent_performance, performance_percentage,
};
pub use rankings::{
    CustomerRebate, CustomerSpend, ProductSales, REBATE_RATE, customer_rebates,
    product_sales_ranking, top_customers,
};
pub use totals::{
    AdminSummary, AgentSummary, DashboardSummary, EntityCounts, dashboard_summary, entity_counts,
    products_sold, revenue_total,
};
pub use tracking::{ACTIVE_WINDOW, Activity, TrackedAgent, activity, agent_tracking, time_ago};

/// Size of every top-N table.
pub const TOP_N: usize = 5;

pub const UNKNOWN_AGENT: &str = "Unknown Agent";
pub const UNKNOWN_CUSTOMER: &str = "Unknown Customer";
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
pub const NOT_ASSIGNED: &str = "Not Assigned";

/// The three tables of the reports page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportSet {
    pub agent_performance: Vec<AgentPerformance>,
    pub customer_rebates: Vec<CustomerRebate>,
    pub product_sales: Vec<ProductSales>,
}

impl ReportSet {
    pub fn compute(snapshot: &Snapshot, scope: &Scope) -> Self {
        Self {
            agent_performance: agent_performance(&snapshot.agents, &snapshot.orders, scope),
            customer_rebates: customer_rebates(&snapshot.customers, scope, TOP_N),
            product_sales: product_sales_ranking(
                &snapshot.orders,
                &snapshot.products,
                scope,
                TOP_N,
            ),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agent_performance.is_empty()
            && self.customer_rebates.is_empty()
            && self.product_sales.is_empty()
    }
}
