//! CSV export of the reports page.

use csv::Writer;
use serde::Serialize;

use crate::{EngineError, ResultEngine, reports::ReportSet};

#[derive(Serialize)]
struct ExportRow<'a> {
    report: &'static str,
    name: &'a str,
    amount: f64,
    target: Option<f64>,
    percentage: Option<i64>,
    purchases: Option<f64>,
}

/// Serialize the three report tables into one CSV document.
///
/// Every row carries a `report` column (`agent_performance`,
/// `customer_rebates` or `product_sales`); `amount` is the sales figure or the
/// rebate depending on the table.
pub fn reports_csv(reports: &ReportSet) -> ResultEngine<Vec<u8>> {
    let mut writer = Writer::from_writer(vec![]);

    for row in &reports.agent_performance {
        write_row(
            &mut writer,
            ExportRow {
                report: "agent_performance",
                name: &row.name,
                amount: row.sales,
                target: Some(row.target),
                percentage: Some(row.percentage),
                purchases: None,
            },
        )?;
    }
    for row in &reports.customer_rebates {
        write_row(
            &mut writer,
            ExportRow {
                report: "customer_rebates",
                name: &row.name,
                amount: row.rebate,
                target: None,
                percentage: None,
                purchases: Some(row.purchases),
            },
        )?;
    }
    for row in &reports.product_sales {
        write_row(
            &mut writer,
            ExportRow {
                report: "product_sales",
                name: &row.name,
                amount: row.sales,
                target: None,
                percentage: None,
                purchases: None,
            },
        )?;
    }

    writer.into_inner().map_err(|err| {
        tracing::error!("failed to finalize export: {err}");
        EngineError::Export(err.to_string())
    })
}

fn write_row(writer: &mut Writer<Vec<u8>>, row: ExportRow<'_>) -> ResultEngine<()> {
    writer.serialize(row).map_err(|err| {
        tracing::error!("failed to serialize export row: {err}");
        EngineError::Export(err.to_string())
    })
}
