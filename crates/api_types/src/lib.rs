use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A latitude/longitude pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

pub mod code {
    use super::*;

    /// The code the next created record would receive.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct NextCode {
        pub code: String,
    }
}

pub mod dashboard {
    use super::*;

    /// Header cards. Admins get every count; agents get their own totals and
    /// the number of units they sold.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(tag = "view", rename_all = "snake_case")]
    pub enum Dashboard {
        Admin {
            total_revenue: f64,
            total_customers: usize,
            total_orders: usize,
            total_agents: usize,
            total_products: usize,
            total_territories: usize,
        },
        Agent {
            total_revenue: f64,
            total_customers: usize,
            total_orders: usize,
            total_products_sold: f64,
        },
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyQuery {
        pub year: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyRevenue {
        pub month: String,
        pub total: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyResponse {
        pub months: Vec<MonthlyRevenue>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TopCustomer {
        pub id: String,
        pub customer_id: String,
        pub name: String,
        pub email: String,
        pub total_spent: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TopCustomersResponse {
        pub customers: Vec<TopCustomer>,
    }
}

pub mod report {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AgentPerformanceView {
        pub id: String,
        pub agent_id: String,
        pub name: String,
        pub sales: f64,
        pub target: f64,
        /// Share of the target reached, capped at 100.
        pub percentage: i64,
        pub met_target: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RebateView {
        pub id: String,
        pub name: String,
        pub purchases: f64,
        pub rebate: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductSalesView {
        pub product_id: String,
        pub name: String,
        pub sales: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportsResponse {
        pub agent_performance: Vec<AgentPerformanceView>,
        pub customer_rebates: Vec<RebateView>,
        pub product_sales: Vec<ProductSalesView>,
    }

    /// Performance card of the agent detail screen.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AgentDetailView {
        pub performance: AgentPerformanceView,
        pub order_count: usize,
        pub customer_count: usize,
        pub monthly: Vec<super::dashboard::MonthlyRevenue>,
    }
}

pub mod agent {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AgentStatus {
        Active,
        Inactive,
        Suspended,
        Unknown,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AgentNew {
        pub name: String,
        #[serde(default)]
        pub email: String,
        #[serde(default)]
        pub contact: String,
        #[serde(default)]
        pub area_covered: String,
        pub status: Option<AgentStatus>,
        pub sales_target: Option<f64>,
        pub latitude: Option<f64>,
        pub longitude: Option<f64>,
        pub user_id: Option<String>,
    }

    /// Partial update; absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AgentUpdate {
        pub name: Option<String>,
        pub email: Option<String>,
        pub contact: Option<String>,
        pub area_covered: Option<String>,
        pub status: Option<AgentStatus>,
        pub sales_target: Option<f64>,
        pub latitude: Option<f64>,
        pub longitude: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AgentView {
        /// Store key.
        pub id: String,
        /// Human-readable `BIGD-NNNN` code.
        pub agent_id: String,
        pub name: String,
        pub email: String,
        pub contact: String,
        pub area_covered: String,
        pub status: AgentStatus,
        pub sales_target: f64,
        pub customers_count: u64,
        pub total_sales: f64,
        pub created_at: Option<DateTime<Utc>>,
        pub last_updated: Option<DateTime<Utc>>,
        pub position: Option<Position>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AgentsResponse {
        pub agents: Vec<AgentView>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Activity {
        Active,
        Inactive,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TrackedAgentView {
        pub id: String,
        pub agent_id: String,
        pub name: String,
        pub contact: String,
        pub area_covered: String,
        pub position: Option<Position>,
        pub last_updated: Option<DateTime<Utc>>,
        pub activity: Activity,
        /// "5 mins ago", "Never", ...
        pub last_seen: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TrackingResponse {
        pub agents: Vec<TrackedAgentView>,
    }
}

pub mod customer {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CustomerStatus {
        Active,
        Inactive,
        Blocked,
        Unknown,
    }

    /// New customer. Agents creating a customer own it unless `agent_id` says
    /// otherwise.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerNew {
        pub name: String,
        #[serde(default)]
        pub email: String,
        #[serde(default)]
        pub contact: String,
        #[serde(default)]
        pub location: String,
        pub agent_id: Option<String>,
        pub status: Option<CustomerStatus>,
        pub latitude: Option<f64>,
        pub longitude: Option<f64>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CustomerUpdate {
        pub name: Option<String>,
        pub email: Option<String>,
        pub contact: Option<String>,
        pub location: Option<String>,
        pub agent_id: Option<String>,
        pub status: Option<CustomerStatus>,
        pub latitude: Option<f64>,
        pub longitude: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerView {
        pub id: String,
        /// Human-readable `CUST-NNNN` code.
        pub customer_id: String,
        pub name: String,
        pub email: String,
        pub contact: String,
        pub location: String,
        pub agent_id: String,
        /// Resolved agent name, only filled in listings.
        pub agent_name: Option<String>,
        pub status: CustomerStatus,
        pub total_spent: f64,
        pub total_orders: u64,
        pub created_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomersResponse {
        pub customers: Vec<CustomerView>,
    }
}

pub mod order {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum OrderStatus {
        Pending,
        Processing,
        Completed,
        Cancelled,
        Unknown,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderItem {
        pub product_id: String,
        #[serde(default)]
        pub product_name: String,
        pub quantity: f64,
        pub unit_price: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderNew {
        pub customer_id: String,
        pub customer_name: Option<String>,
        /// Calendar date, `YYYY-MM-DD`. Defaults to today.
        #[serde(default)]
        pub order_date: String,
        pub status: Option<OrderStatus>,
        pub items: Vec<OrderItem>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct OrderUpdate {
        pub status: Option<OrderStatus>,
        pub order_date: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderView {
        pub id: String,
        /// `ORD-NNNNNN`.
        pub order_id: String,
        pub customer_id: String,
        pub customer_name: String,
        pub agent_id: String,
        pub order_date: String,
        pub items: Vec<OrderItem>,
        pub total_amount: f64,
        pub status: OrderStatus,
        pub created_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrdersResponse {
        pub orders: Vec<OrderView>,
    }
}

pub mod product {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductView {
        pub id: String,
        pub name: String,
        pub price: f64,
        pub sku: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductsResponse {
        pub products: Vec<ProductView>,
    }
}
