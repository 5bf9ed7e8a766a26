use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    Collection, Customer, EngineError, NewOrder, Order, OrderPatch, ResultEngine, Scope,
    reports::{self, OrderOwner},
};

use super::{Engine, normalize_optional_text};

impl Engine {
    /// Orders visible in `scope`, newest first.
    pub async fn orders(&self, scope: &Scope) -> ResultEngine<Vec<Order>> {
        let orders: Vec<Order> = self.records().await?;
        Ok(reports::scoped_orders(&orders, scope))
    }

    /// Orders taken by one agent, newest first.
    pub async fn agent_orders(&self, agent_id: &str, scope: &Scope) -> ResultEngine<Vec<Order>> {
        scope.ensure_includes(agent_id)?;
        let orders: Vec<Order> = self.records().await?;
        Ok(reports::order_history(
            &orders,
            OrderOwner::Agent(agent_id),
            scope,
        ))
    }

    /// Orders of one customer visible in `scope`, newest first.
    pub async fn customer_orders(
        &self,
        customer_id: &str,
        scope: &Scope,
    ) -> ResultEngine<Vec<Order>> {
        let customer = self.customer(customer_id, scope).await?;
        let orders: Vec<Order> = self.records().await?;
        Ok(reports::order_history(
            &orders,
            OrderOwner::Customer(&customer.id),
            scope,
        ))
    }

    /// Record a new order and bump the customer's totals.
    ///
    /// The order belongs to the scoped agent, or to nobody for admins. An
    /// agent can only order for its own customers. A missing customer does not
    /// block the order; its totals are simply not updated.
    pub async fn create_order(&self, new: NewOrder, scope: &Scope) -> ResultEngine<Order> {
        if new.items.is_empty() {
            return Err(EngineError::InvalidRecord(
                "an order needs at least one item".to_string(),
            ));
        }
        if new.items.iter().any(|item| item.product_id.trim().is_empty()) {
            return Err(EngineError::InvalidRecord(
                "every item needs a product".to_string(),
            ));
        }
        let customer_id = new.customer_id.trim().to_string();
        if customer_id.is_empty() {
            return Err(EngineError::InvalidRecord(
                "an order needs a customer".to_string(),
            ));
        }

        let now = Utc::now();
        let total_amount = new.items.iter().map(|item| item.subtotal()).sum();

        let _guard = self.allocation.lock().await;
        let customer = match self.store.get(Collection::Customers, &customer_id).await? {
            Some(value) => super::decode_value::<Customer>(&customer_id, value).ok(),
            None => None,
        };
        if let Some(customer) = &customer {
            scope.ensure_includes(&customer.agent_id)?;
        }
        let customer_name = normalize_optional_text(new.customer_name.as_deref())
            .or_else(|| customer.as_ref().map(|customer| customer.name.clone()))
            .unwrap_or_default();

        let order = Order {
            id: Uuid::now_v7().to_string(),
            order_id: order_code(now.timestamp_millis()),
            customer_id,
            customer_name,
            agent_id: scope.agent_id().unwrap_or_default().to_string(),
            order_date: normalize_optional_text(Some(&new.order_date))
                .unwrap_or_else(|| now.format("%Y-%m-%d").to_string()),
            items: new.items,
            total_amount,
            status: new.status.unwrap_or_default(),
            created_at: Some(now),
        };
        self.store
            .create(Collection::Orders, &order.id, serde_json::to_value(&order)?)
            .await?;

        match customer {
            Some(customer) => {
                let totals = json!({
                    "total_spent": customer.total_spent + order.total_amount,
                    "total_orders": customer.total_orders + 1,
                });
                self.store
                    .update(Collection::Customers, &customer.id, totals)
                    .await?;
            }
            None => {
                tracing::warn!(
                    "order {} references unknown customer {}",
                    order.order_id,
                    order.customer_id
                );
            }
        }
        tracing::info!("created order {} ({})", order.order_id, order.id);
        Ok(order)
    }

    /// Change the status or date of an order visible in `scope`.
    pub async fn update_order(
        &self,
        id: &str,
        patch: OrderPatch,
        scope: &Scope,
    ) -> ResultEngine<Order> {
        let order: Order = self.record(id).await?;
        scope.ensure_includes(&order.agent_id)?;

        let partial = serde_json::to_value(&patch)?;
        self.store.update(Collection::Orders, id, partial).await?;
        self.record(id).await
    }
}

/// `ORD-` followed by the last six digits of the millisecond clock.
fn order_code(epoch_millis: i64) -> String {
    format!("ORD-{:06}", epoch_millis.rem_euclid(1_000_000))
}
