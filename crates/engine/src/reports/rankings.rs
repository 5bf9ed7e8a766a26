//! Top-N tables: best customers, best-selling products, rebates.
//!
//! All rankings sort descending with a stable sort, so equal values keep the
//! store's iteration order.

use std::collections::HashMap;

use crate::{Customer, Order, Product, Scope};

use super::{UNKNOWN_CUSTOMER, UNKNOWN_PRODUCT};

/// Fixed share of lifetime spend returned to the customer.
pub const REBATE_RATE: f64 = 0.10;

#[derive(Clone, Debug, PartialEq)]
pub struct CustomerSpend {
    pub customer_key: String,
    pub code: String,
    pub name: String,
    pub email: String,
    pub total_spent: f64,
}

/// The `limit` customers with the highest `total_spent` in `scope`.
pub fn top_customers(customers: &[Customer], scope: &Scope, limit: usize) -> Vec<CustomerSpend> {
    let mut ranked: Vec<CustomerSpend> = customers
        .iter()
        .filter(|customer| scope.includes(&customer.agent_id))
        .map(|customer| CustomerSpend {
            customer_key: customer.id.clone(),
            code: customer.customer_id.clone(),
            name: customer_name(customer),
            email: customer.email.clone(),
            total_spent: customer.total_spent,
        })
        .collect();
    ranked.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    ranked.truncate(limit);
    ranked
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProductSales {
    pub product_id: String,
    pub name: String,
    pub sales: f64,
}

/// Line-item revenue per product over the orders in `scope`, best first.
///
/// Items without a product reference, quantity or unit price are ignored.
/// Product names come from `products`; dangling references are reported as
/// "Unknown Product".
pub fn product_sales_ranking(
    orders: &[Order],
    products: &[Product],
    scope: &Scope,
    limit: usize,
) -> Vec<ProductSales> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, f64)> = Vec::new();

    let items = orders
        .iter()
        .filter(|order| scope.includes(&order.agent_id))
        .flat_map(|order| order.items.iter());
    for item in items {
        if item.product_id.is_empty() || item.quantity == 0.0 || item.unit_price == 0.0 {
            continue;
        }
        let index = *position.entry(item.product_id.as_str()).or_insert_with(|| {
            totals.push((item.product_id.as_str(), 0.0));
            totals.len() - 1
        });
        totals[index].1 += item.subtotal();
    }

    let names: HashMap<&str, &str> = products
        .iter()
        .map(|product| (product.id.as_str(), product.name.as_str()))
        .collect();

    let mut ranked: Vec<ProductSales> = totals
        .into_iter()
        .map(|(product_id, sales)| ProductSales {
            product_id: product_id.to_string(),
            name: names
                .get(product_id)
                .filter(|name| !name.trim().is_empty())
                .map_or_else(|| UNKNOWN_PRODUCT.to_string(), |name| name.to_string()),
            sales,
        })
        .collect();
    ranked.sort_by(|a, b| b.sales.total_cmp(&a.sales));
    ranked.truncate(limit);
    ranked
}

#[derive(Clone, Debug, PartialEq)]
pub struct CustomerRebate {
    pub customer_key: String,
    pub name: String,
    pub purchases: f64,
    pub rebate: f64,
}

/// Rebates owed to the customers in `scope`, largest first.
///
/// Customers who have not spent anything are left out entirely.
pub fn customer_rebates(customers: &[Customer], scope: &Scope, limit: usize) -> Vec<CustomerRebate> {
    let mut ranked: Vec<CustomerRebate> = customers
        .iter()
        .filter(|customer| scope.includes(&customer.agent_id))
        .filter(|customer| customer.total_spent > 0.0)
        .map(|customer| CustomerRebate {
            customer_key: customer.id.clone(),
            name: customer_name(customer),
            purchases: customer.total_spent,
            rebate: customer.total_spent * REBATE_RATE,
        })
        .collect();
    ranked.sort_by(|a, b| b.rebate.total_cmp(&a.rebate));
    ranked.truncate(limit);
    ranked
}

fn customer_name(customer: &Customer) -> String {
    if customer.name.trim().is_empty() {
        UNKNOWN_CUSTOMER.to_string()
    } else {
        customer.name.clone()
    }
}
