//! Listings that resolve soft references between records.

use std::cmp::Reverse;

use crate::{Agent, Customer, Order, Scope, Snapshot};

use super::{NOT_ASSIGNED, UNKNOWN_AGENT};

/// Name of the agent with store key `agent_key`, as shown next to a customer.
///
/// An empty key means the customer is unassigned; a key that matches no agent
/// is a dangling reference left behind by a deleted agent.
pub fn agent_name(agents: &[Agent], agent_key: &str) -> String {
    if agent_key.trim().is_empty() {
        return NOT_ASSIGNED.to_string();
    }
    agents
        .iter()
        .find(|agent| agent.id == agent_key)
        .map(|agent| agent.name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_AGENT)
        .to_string()
}

#[derive(Clone, Debug, PartialEq)]
pub struct CustomerListing {
    pub customer: Customer,
    pub agent_name: String,
}

/// Every customer in `scope` with its resolved agent name, in store order.
pub fn customer_directory(snapshot: &Snapshot, scope: &Scope) -> Vec<CustomerListing> {
    snapshot
        .customers
        .iter()
        .filter(|customer| scope.includes(&customer.agent_id))
        .map(|customer| CustomerListing {
            customer: customer.clone(),
            agent_name: agent_name(&snapshot.agents, &customer.agent_id),
        })
        .collect()
}

/// Whose orders to list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderOwner<'a> {
    Agent(&'a str),
    Customer(&'a str),
}

impl OrderOwner<'_> {
    fn owns(&self, order: &Order) -> bool {
        match self {
            Self::Agent(key) => order.agent_id == *key,
            Self::Customer(key) => order.customer_id == *key,
        }
    }
}

/// Orders of one agent or customer visible in `scope`, newest first.
///
/// Orders whose date cannot be parsed sort after every dated order.
pub fn order_history(orders: &[Order], owner: OrderOwner<'_>, scope: &Scope) -> Vec<Order> {
    let mut history: Vec<Order> = orders
        .iter()
        .filter(|order| owner.owns(order) && scope.includes(&order.agent_id))
        .cloned()
        .collect();
    newest_first(&mut history);
    history
}

/// All orders visible in `scope`, newest first.
pub fn scoped_orders(orders: &[Order], scope: &Scope) -> Vec<Order> {
    match scope {
        Scope::All => {
            let mut all = orders.to_vec();
            newest_first(&mut all);
            all
        }
        Scope::Agent(key) => order_history(orders, OrderOwner::Agent(key), scope),
    }
}

// `None < Some`, so a descending sort leaves undated orders at the end.
fn newest_first(orders: &mut [Order]) {
    orders.sort_by_cached_key(|order| Reverse(order.date()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(key: &str, name: &str) -> Agent {
        Agent {
            id: key.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn order(key: &str, agent: &str, customer: &str, date: &str) -> Order {
        Order {
            id: key.to_string(),
            agent_id: agent.to_string(),
            customer_id: customer.to_string(),
            order_date: date.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn agent_names_fall_back_to_sentinels() {
        let agents = vec![agent("a1", "Ana"), agent("a2", " ")];
        assert_eq!(agent_name(&agents, "a1"), "Ana");
        assert_eq!(agent_name(&agents, ""), NOT_ASSIGNED);
        assert_eq!(agent_name(&agents, "deleted"), UNKNOWN_AGENT);
        assert_eq!(agent_name(&agents, "a2"), UNKNOWN_AGENT);
    }

    #[test]
    fn directory_resolves_agents_within_scope() {
        let snapshot = Snapshot {
            agents: vec![agent("a1", "Ana")],
            customers: vec![
                Customer {
                    id: "c1".to_string(),
                    agent_id: "a1".to_string(),
                    ..Default::default()
                },
                Customer {
                    id: "c2".to_string(),
                    agent_id: "gone".to_string(),
                    ..Default::default()
                },
                Customer {
                    id: "c3".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let names: Vec<String> = customer_directory(&snapshot, &Scope::All)
            .into_iter()
            .map(|listing| listing.agent_name)
            .collect();
        assert_eq!(names, ["Ana", UNKNOWN_AGENT, NOT_ASSIGNED]);

        let own = customer_directory(&snapshot, &Scope::Agent("a1".to_string()));
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].customer.id, "c1");
    }

    #[test]
    fn history_is_newest_first_with_undated_last() {
        let orders = vec![
            order("o1", "a1", "c1", "2024-01-10"),
            order("o2", "a1", "c1", "No date"),
            order("o3", "a1", "c2", "2024-05-01"),
            order("o4", "a2", "c1", "2024-09-01"),
            order("o5", "a1", "c1", "2024-03-01"),
        ];

        let ids = |orders: Vec<Order>| orders.into_iter().map(|o| o.id).collect::<Vec<_>>();

        let by_agent = order_history(&orders, OrderOwner::Agent("a1"), &Scope::All);
        assert_eq!(ids(by_agent), ["o3", "o5", "o1", "o2"]);

        let by_customer = order_history(&orders, OrderOwner::Customer("c1"), &Scope::All);
        assert_eq!(ids(by_customer), ["o4", "o5", "o1", "o2"]);

        let scoped = order_history(
            &orders,
            OrderOwner::Customer("c1"),
            &Scope::Agent("a2".to_string()),
        );
        assert_eq!(ids(scoped), ["o4"]);
    }
}
