use crate::{
    Customer, EngineError, Order, Product, ResultEngine, Scope, export,
    reports::{self, AgentDetail, CustomerSpend, DashboardSummary, MonthlyTotal, ReportSet, TOP_N},
};

use super::Engine;

impl Engine {
    /// Summary widgets of the dashboard: the admin set for `Scope::All`,
    /// the agent set otherwise.
    pub async fn dashboard(&self, scope: &Scope) -> ResultEngine<DashboardSummary> {
        let snapshot = self.snapshot().await?;
        Ok(reports::dashboard_summary(&snapshot, scope))
    }

    /// Revenue per calendar month, optionally restricted to one year.
    pub async fn monthly_revenue(
        &self,
        scope: &Scope,
        year: Option<i32>,
    ) -> ResultEngine<Vec<MonthlyTotal>> {
        let orders: Vec<Order> = self.records().await?;
        Ok(reports::monthly_revenue(&orders, scope, year))
    }

    pub async fn top_customers(&self, scope: &Scope) -> ResultEngine<Vec<CustomerSpend>> {
        let customers: Vec<Customer> = self.records().await?;
        Ok(reports::top_customers(&customers, scope, TOP_N))
    }

    /// The reports page: agent performance, rebates and product sales.
    pub async fn reports(&self, scope: &Scope) -> ResultEngine<ReportSet> {
        let snapshot = self.snapshot().await?;
        Ok(ReportSet::compute(&snapshot, scope))
    }

    /// The reports page as CSV.
    pub async fn export_reports(&self, scope: &Scope) -> ResultEngine<Vec<u8>> {
        let reports = self.reports(scope).await?;
        export::reports_csv(&reports)
    }

    /// Performance card of one agent.
    pub async fn agent_detail(&self, agent_id: &str, scope: &Scope) -> ResultEngine<AgentDetail> {
        scope.ensure_includes(agent_id)?;
        let snapshot = self.snapshot().await?;
        reports::agent_detail(&snapshot, agent_id)
            .ok_or_else(|| EngineError::KeyNotFound(agent_id.to_string()))
    }

    pub async fn products(&self) -> ResultEngine<Vec<Product>> {
        self.records().await
    }
}
