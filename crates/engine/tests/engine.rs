use std::{collections::BTreeMap, sync::Arc};

use chrono::{Duration, Utc};
use sea_orm::Database;
use serde_json::json;

use engine::{
    AgentPatch, Collection, CustomerPatch, Documents, Engine, EngineError, MemoryStore, NewAgent,
    NewCustomer, NewOrder, OrderItem, OrderPatch, OrderStatus, Scope,
    reports::{self, Activity, DashboardSummary, NOT_ASSIGNED, UNKNOWN_AGENT},
};
use migration::MigratorTrait;

async fn engine_with_documents(collections: BTreeMap<Collection, Documents>) -> Engine {
    Engine::builder()
        .store(Arc::new(MemoryStore::with_documents(collections)))
        .build()
        .await
        .unwrap()
}

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn documents(entries: &[(&str, serde_json::Value)]) -> Documents {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// Two agents, two customers, three orders.
async fn seeded() -> Engine {
    let mut collections = BTreeMap::new();
    collections.insert(
        Collection::Agents,
        documents(&[
            (
                "a1",
                json!({ "agent_id": "BIGD-0001", "name": "Ana", "sales_target": 50000 }),
            ),
            (
                "a2",
                json!({ "agent_id": "BIGD-0007", "name": "Ben", "sales_target": "200" }),
            ),
        ]),
    );
    collections.insert(
        Collection::Customers,
        documents(&[
            (
                "c1",
                json!({ "customer_id": "CUST-0001", "name": "Acme", "agent_id": "a1", "total_spent": 10000 }),
            ),
            (
                "c2",
                json!({ "customer_id": "CUST-0002", "name": "Bolt", "agent_id": "a2", "total_spent": 0 }),
            ),
        ]),
    );
    collections.insert(
        Collection::Products,
        documents(&[("p1", json!({ "name": "Widget", "price": 50 }))]),
    );
    collections.insert(
        Collection::Orders,
        documents(&[
            (
                "o1",
                json!({
                    "agent_id": "a1", "customer_id": "c1", "order_date": "2024-01-15",
                    "total_amount": 100,
                    "items": [{ "product_id": "p1", "quantity": 2, "unit_price": 50 }]
                }),
            ),
            (
                "o2",
                json!({
                    "agent_id": "a2", "customer_id": "c2", "order_date": "2024-03-02",
                    "total_amount": 200,
                    "items": [{ "product_id": "p1", "quantity": 4, "unit_price": 50 }]
                }),
            ),
            (
                "o3",
                json!({ "agent_id": "a2", "customer_id": "c2", "order_date": "sometime", "total_amount": "50" }),
            ),
        ]),
    );
    engine_with_documents(collections).await
}

fn new_agent(name: &str) -> NewAgent {
    NewAgent {
        name: name.to_string(),
        ..Default::default()
    }
}

fn item(product_id: &str, quantity: f64, unit_price: f64) -> OrderItem {
    OrderItem {
        product_id: product_id.to_string(),
        product_name: String::new(),
        quantity,
        unit_price,
    }
}

#[tokio::test]
async fn dashboard_scopes_revenue_by_agent() {
    let engine = seeded().await;

    let DashboardSummary::Admin(admin) = engine.dashboard(&Scope::All).await.unwrap() else {
        panic!("admin scope must yield the admin summary");
    };
    assert_eq!(admin.total_revenue, 350.0);
    assert_eq!(admin.total_agents, 2);
    assert_eq!(admin.total_orders, 3);
    assert_eq!(admin.total_products, 1);

    let scope = Scope::Agent("a1".to_string());
    let DashboardSummary::Agent(agent) = engine.dashboard(&scope).await.unwrap() else {
        panic!("agent scope must yield the agent summary");
    };
    assert_eq!(agent.total_revenue, 100.0);
    assert_eq!(agent.total_customers, 1);
    assert_eq!(agent.total_orders, 1);
    assert_eq!(agent.total_products_sold, 2.0);
}

#[tokio::test]
async fn monthly_series_skips_undated_orders() {
    let engine = seeded().await;
    let series = engine.monthly_revenue(&Scope::All, None).await.unwrap();
    assert_eq!(series.len(), 12);
    assert_eq!(series[0].total, 100.0);
    assert_eq!(series[2].total, 200.0);
    assert_eq!(series.iter().map(|m| m.total).sum::<f64>(), 300.0);

    let other_year = engine.monthly_revenue(&Scope::All, Some(2023)).await.unwrap();
    assert!(other_year.iter().all(|m| m.total == 0.0));
}

#[tokio::test]
async fn reports_cap_performance_and_skip_zero_rebates() {
    let engine = seeded().await;
    let reports = engine.reports(&Scope::All).await.unwrap();

    let ben = reports
        .agent_performance
        .iter()
        .find(|row| row.agent_key == "a2")
        .unwrap();
    assert_eq!(ben.sales, 250.0);
    assert_eq!(ben.target, 200.0);
    assert_eq!(ben.percentage, 100);
    assert!(ben.met_target);

    assert_eq!(reports.customer_rebates.len(), 1);
    assert_eq!(reports.customer_rebates[0].rebate, 1000.0);

    assert_eq!(reports.product_sales.len(), 1);
    assert_eq!(reports.product_sales[0].name, "Widget");
    assert_eq!(reports.product_sales[0].sales, 300.0);

    let scoped = engine
        .reports(&Scope::Agent("a1".to_string()))
        .await
        .unwrap();
    assert_eq!(scoped.agent_performance.len(), 1);
    assert_eq!(scoped.product_sales[0].sales, 100.0);
}

#[tokio::test]
async fn export_contains_every_report_row() {
    let engine = seeded().await;
    let csv = String::from_utf8(engine.export_reports(&Scope::All).await.unwrap()).unwrap();
    assert!(csv.starts_with("report,name,amount,target,percentage,purchases\n"));
    assert_eq!(csv.lines().filter(|l| l.starts_with("agent_performance")).count(), 2);
    assert!(csv.contains("customer_rebates,Acme,1000.0,,,10000.0"));
    assert!(csv.contains("product_sales,Widget,300.0,,,"));
}

#[tokio::test]
async fn scoped_caller_cannot_read_other_agents() {
    let engine = seeded().await;
    let scope = Scope::Agent("a1".to_string());

    assert!(matches!(
        engine.agent_detail("a2", &scope).await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine.agent_orders("a2", &scope).await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine.customer("c2", &scope).await,
        Err(EngineError::Forbidden(_))
    ));

    let detail = engine.agent_detail("a1", &scope).await.unwrap();
    assert_eq!(detail.order_count, 1);
    assert_eq!(detail.customer_count, 1);
    assert_eq!(detail.performance.sales, 100.0);

    assert_eq!(
        engine.agent_detail("ghost", &Scope::All).await.unwrap_err(),
        EngineError::KeyNotFound("ghost".to_string())
    );
}

#[tokio::test]
async fn histories_are_newest_first() {
    let engine = seeded().await;
    let ids: Vec<String> = engine
        .customer_orders("c2", &Scope::All)
        .await
        .unwrap()
        .into_iter()
        .map(|order| order.id)
        .collect();
    assert_eq!(ids, ["o2", "o3"]);

    let all: Vec<String> = engine
        .orders(&Scope::All)
        .await
        .unwrap()
        .into_iter()
        .map(|order| order.id)
        .collect();
    assert_eq!(all, ["o2", "o1", "o3"]);
}

#[tokio::test]
async fn next_codes_follow_the_highest_existing_code() {
    let engine = seeded().await;
    assert_eq!(engine.next_agent_code().await.unwrap(), "BIGD-0008");
    assert_eq!(engine.next_customer_code().await.unwrap(), "CUST-0003");

    let empty = engine_with_db().await;
    assert_eq!(empty.next_agent_code().await.unwrap(), "BIGD-0001");
}

#[tokio::test]
async fn create_agent_fills_defaults() {
    let engine = engine_with_db().await;
    let agent = engine.create_agent(new_agent("  Ana ")).await.unwrap();
    assert_eq!(agent.agent_id, "BIGD-0001");
    assert_eq!(agent.name, "Ana");
    assert_eq!(agent.sales_target, 50_000.0);
    assert_eq!(agent.customers_count, 0);
    assert!(agent.created_at.is_some());

    let stored = engine.agent(&agent.id, &Scope::All).await.unwrap();
    assert_eq!(stored.agent_id, "BIGD-0001");
    assert_eq!(stored.status, agent.status);

    let second = engine.create_agent(new_agent("Ben")).await.unwrap();
    assert_eq!(second.agent_id, "BIGD-0002");

    assert!(matches!(
        engine.create_agent(new_agent("  ")).await,
        Err(EngineError::InvalidRecord(_))
    ));
}

#[tokio::test]
async fn concurrent_creates_get_distinct_codes() {
    let engine = Arc::new(engine_with_db().await);

    let mut handles = Vec::new();
    for i in 0..8 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine
                .create_agent(new_agent(&format!("Agent {i}")))
                .await
                .unwrap()
                .agent_id
        }));
    }
    let mut codes = Vec::new();
    for handle in handles {
        codes.push(handle.await.unwrap());
    }
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), 8);
    assert_eq!(codes.last().unwrap(), "BIGD-0008");
}

#[tokio::test]
async fn update_and_delete_agent() {
    let engine = engine_with_db().await;
    let agent = engine.create_agent(new_agent("Ana")).await.unwrap();

    let patch = AgentPatch {
        area_covered: Some("Cebu".to_string()),
        sales_target: Some(80_000.0),
        ..Default::default()
    };
    let updated = engine
        .update_agent(&agent.id, patch, &Scope::All)
        .await
        .unwrap();
    assert_eq!(updated.area_covered, "Cebu");
    assert_eq!(updated.sales_target, 80_000.0);
    assert_eq!(updated.name, "Ana");
    assert!(updated.last_updated >= agent.last_updated);

    engine.delete_agent(&agent.id).await.unwrap();
    assert_eq!(
        engine.agent(&agent.id, &Scope::All).await.unwrap_err(),
        EngineError::KeyNotFound(agent.id.clone())
    );
    assert!(matches!(
        engine
            .update_agent(&agent.id, AgentPatch::default(), &Scope::All)
            .await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn agents_patch_only_their_own_contact_details() {
    let engine = seeded().await;
    let scope = Scope::Agent("a1".to_string());

    let updated = engine
        .update_agent(
            "a1",
            AgentPatch {
                contact: Some("0917".to_string()),
                latitude: Some(14.6),
                longitude: Some(121.0),
                ..Default::default()
            },
            &scope,
        )
        .await
        .unwrap();
    assert_eq!(updated.contact, "0917");

    let target = AgentPatch {
        sales_target: Some(1.0),
        ..Default::default()
    };
    assert!(matches!(
        engine.update_agent("a1", target.clone(), &scope).await,
        Err(EngineError::Forbidden(_))
    ));
    let status = AgentPatch {
        status: Some(engine::AgentStatus::Inactive),
        ..Default::default()
    };
    assert!(matches!(
        engine.update_agent("a1", status, &scope).await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine.update_agent("a2", AgentPatch::default(), &scope).await,
        Err(EngineError::Forbidden(_))
    ));

    let agent = engine.agent("a1", &Scope::All).await.unwrap();
    assert_eq!(agent.sales_target, 50_000.0);
}

#[tokio::test]
async fn created_records_keep_creation_order() {
    let engine = engine_with_db().await;
    for i in 0..8 {
        engine
            .create_customer(NewCustomer {
                name: format!("Customer {i}"),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let codes: Vec<String> = engine
        .top_customers(&Scope::All)
        .await
        .unwrap()
        .into_iter()
        .map(|customer| customer.code)
        .collect();
    assert_eq!(
        codes,
        ["CUST-0001", "CUST-0002", "CUST-0003", "CUST-0004", "CUST-0005"]
    );
}

#[tokio::test]
async fn deleted_agent_leaves_dangling_names() {
    let engine = engine_with_db().await;
    let agent = engine.create_agent(new_agent("Ana")).await.unwrap();
    engine
        .create_customer(NewCustomer {
            name: "Acme".to_string(),
            agent_id: Some(agent.id.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    engine
        .create_customer(NewCustomer {
            name: "Walk-in".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    engine.delete_agent(&agent.id).await.unwrap();

    let names: Vec<String> = engine
        .customer_directory(&Scope::All)
        .await
        .unwrap()
        .into_iter()
        .map(|listing| listing.agent_name)
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&UNKNOWN_AGENT.to_string()));
    assert!(names.contains(&NOT_ASSIGNED.to_string()));
}

#[tokio::test]
async fn create_order_bumps_customer_totals() {
    let engine = engine_with_db().await;
    let agent = engine.create_agent(new_agent("Ana")).await.unwrap();
    let customer = engine
        .create_customer(NewCustomer {
            name: "Acme".to_string(),
            agent_id: Some(agent.id.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(customer.customer_id, "CUST-0001");

    let scope = Scope::Agent(agent.id.clone());
    let order = engine
        .create_order(
            NewOrder {
                customer_id: customer.id.clone(),
                order_date: "2024-05-01".to_string(),
                items: vec![item("p1", 3.0, 50.0), item("p2", 1.0, 25.5)],
                ..Default::default()
            },
            &scope,
        )
        .await
        .unwrap();
    assert!(order.order_id.starts_with("ORD-"));
    assert_eq!(order.order_id.len(), 10);
    assert_eq!(order.total_amount, 175.5);
    assert_eq!(order.agent_id, agent.id);
    assert_eq!(order.customer_name, "Acme");
    assert_eq!(order.status, OrderStatus::Pending);

    let customer = engine.customer(&customer.id, &scope).await.unwrap();
    assert_eq!(customer.total_spent, 175.5);
    assert_eq!(customer.total_orders, 1);

    let orders = engine.agent_orders(&agent.id, &scope).await.unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn agents_only_order_for_their_own_customers() {
    let engine = seeded().await;
    let order = NewOrder {
        customer_id: "c2".to_string(),
        items: vec![item("p1", 1.0, 5000.0)],
        ..Default::default()
    };

    let result = engine
        .create_order(order.clone(), &Scope::Agent("a1".to_string()))
        .await;
    assert!(matches!(result, Err(EngineError::Forbidden(_))));
    let customer = engine.customer("c2", &Scope::All).await.unwrap();
    assert_eq!(customer.total_spent, 0.0);
    assert_eq!(engine.orders(&Scope::All).await.unwrap().len(), 3);

    let order = engine
        .create_order(order, &Scope::Agent("a2".to_string()))
        .await
        .unwrap();
    assert_eq!(order.agent_id, "a2");
    let customer = engine.customer("c2", &Scope::All).await.unwrap();
    assert_eq!(customer.total_spent, 5000.0);
}

#[tokio::test]
async fn create_order_validates_items() {
    let engine = engine_with_db().await;
    let empty = engine
        .create_order(
            NewOrder {
                customer_id: "c1".to_string(),
                ..Default::default()
            },
            &Scope::All,
        )
        .await;
    assert!(matches!(empty, Err(EngineError::InvalidRecord(_))));

    let no_product = engine
        .create_order(
            NewOrder {
                customer_id: "c1".to_string(),
                items: vec![item(" ", 1.0, 1.0)],
                ..Default::default()
            },
            &Scope::All,
        )
        .await;
    assert!(matches!(no_product, Err(EngineError::InvalidRecord(_))));
}

#[tokio::test]
async fn order_for_unknown_customer_is_still_recorded() {
    let engine = engine_with_db().await;
    let order = engine
        .create_order(
            NewOrder {
                customer_id: "ghost".to_string(),
                items: vec![item("p1", 1.0, 10.0)],
                ..Default::default()
            },
            &Scope::All,
        )
        .await
        .unwrap();
    assert_eq!(order.agent_id, "");
    assert!(order.date().is_some());
    assert_eq!(engine.orders(&Scope::All).await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_order_respects_scope() {
    let engine = engine_with_db().await;
    let scope = Scope::Agent("a1".to_string());
    let order = engine
        .create_order(
            NewOrder {
                customer_id: "c1".to_string(),
                items: vec![item("p1", 1.0, 10.0)],
                ..Default::default()
            },
            &scope,
        )
        .await
        .unwrap();

    let patch = OrderPatch {
        status: Some(OrderStatus::Completed),
        ..Default::default()
    };
    let updated = engine
        .update_order(&order.id, patch.clone(), &scope)
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Completed);

    let other = Scope::Agent("a2".to_string());
    assert!(matches!(
        engine.update_order(&order.id, patch, &other).await,
        Err(EngineError::Forbidden(_))
    ));
}

#[tokio::test]
async fn update_and_delete_customer() {
    let engine = engine_with_db().await;
    let customer = engine
        .create_customer(NewCustomer {
            name: "Acme".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let updated = engine
        .update_customer(
            &customer.id,
            CustomerPatch {
                location: Some("Davao".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.location, "Davao");
    assert_eq!(updated.customer_id, "CUST-0001");

    engine.delete_customer(&customer.id).await.unwrap();
    assert!(matches!(
        engine.delete_customer(&customer.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn tracking_follows_agent_writes() {
    let engine = engine_with_db().await;
    let mut watch = engine.watch_agents().await.unwrap();
    assert!(watch.current().is_empty());

    let agent = engine.create_agent(new_agent("Ana")).await.unwrap();
    let agents = watch.next().await.unwrap();
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].id, agent.id);

    let rows = reports::agent_tracking(&agents, Utc::now());
    assert_eq!(rows[0].activity, Activity::Active);

    let later = Utc::now() + Duration::hours(25);
    let rows = reports::agent_tracking(&agents, later);
    assert_eq!(rows[0].activity, Activity::Inactive);
    assert_eq!(rows[0].last_seen, "1 days ago");
}

#[tokio::test]
async fn malformed_documents_never_abort_aggregation() {
    let mut collections = BTreeMap::new();
    collections.insert(
        Collection::Orders,
        documents(&[
            ("o1", json!("corrupted")),
            ("o2", json!({ "total_amount": "abc", "items": null })),
            ("o3", json!({ "total_amount": 42, "order_date": "2024-02-10" })),
        ]),
    );
    collections.insert(
        Collection::Customers,
        documents(&[("c1", json!({ "status": "ACTIVE", "total_spent": "12.5" }))]),
    );
    let engine = engine_with_documents(collections).await;

    let DashboardSummary::Admin(summary) = engine.dashboard(&Scope::All).await.unwrap() else {
        panic!("admin scope must yield the admin summary");
    };
    assert_eq!(summary.total_orders, 2);
    assert_eq!(summary.total_revenue, 42.0);

    let top = engine.top_customers(&Scope::All).await.unwrap();
    assert_eq!(top[0].total_spent, 12.5);
}
