//! Calendar-month revenue series for the overview chart.

use chrono::Datelike;

use crate::{Order, Scope};

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Revenue of one calendar month.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonthlyTotal {
    pub month: &'static str,
    pub total: f64,
}

/// Twelve buckets, January first, zero-filled.
///
/// Orders are bucketed by the calendar month of `order_date`, across every
/// year unless `year` is given. Orders with an unparseable date contribute to
/// no bucket.
pub fn monthly_revenue(orders: &[Order], scope: &Scope, year: Option<i32>) -> Vec<MonthlyTotal> {
    let mut totals = [0.0f64; 12];
    for order in orders.iter().filter(|o| scope.includes(&o.agent_id)) {
        let Some(date) = order.date() else {
            continue;
        };
        if year.is_some_and(|year| date.year() != year) {
            continue;
        }
        totals[date.month0() as usize] += order.total_amount;
    }

    MONTH_NAMES
        .into_iter()
        .zip(totals)
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}
