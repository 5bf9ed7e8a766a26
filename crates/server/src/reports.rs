//! Reports page and its CSV export.

use api_types::report::{AgentPerformanceView, ProductSalesView, RebateView, ReportsResponse};
use axum::{
    Extension, Json,
    extract::State,
    http::header,
    response::IntoResponse,
};
use engine::{Scope, reports::AgentPerformance};

use crate::{ServerError, server::ServerState};

pub(crate) fn performance_view(row: AgentPerformance) -> AgentPerformanceView {
    AgentPerformanceView {
        id: row.agent_key,
        agent_id: row.code,
        name: row.name,
        sales: row.sales,
        target: row.target,
        percentage: row.percentage,
        met_target: row.met_target,
    }
}

pub async fn get(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
) -> Result<Json<ReportsResponse>, ServerError> {
    let reports = state.engine.reports(&scope).await?;

    Ok(Json(ReportsResponse {
        agent_performance: reports
            .agent_performance
            .into_iter()
            .map(performance_view)
            .collect(),
        customer_rebates: reports
            .customer_rebates
            .into_iter()
            .map(|row| RebateView {
                id: row.customer_key,
                name: row.name,
                purchases: row.purchases,
                rebate: row.rebate,
            })
            .collect(),
        product_sales: reports
            .product_sales
            .into_iter()
            .map(|row| ProductSalesView {
                product_id: row.product_id,
                name: row.name,
                sales: row.sales,
            })
            .collect(),
    }))
}

/// The reports page as a CSV download.
pub async fn export(
    Extension(scope): Extension<Scope>,
    State(state): State<ServerState>,
) -> Result<impl IntoResponse, ServerError> {
    let csv = state.engine.export_reports(&scope).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"reports.csv\"",
            ),
        ],
        csv,
    ))
}
