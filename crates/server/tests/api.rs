use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Collection, Documents, Engine, MemoryStore};
use migration::MigratorTrait;

async fn app_with(collections: BTreeMap<Collection, Documents>) -> Router {
    let engine = Engine::builder()
        .store(Arc::new(MemoryStore::with_documents(collections)))
        .build()
        .await
        .unwrap();
    server::app(engine).await.unwrap()
}

async fn app_with_db() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    server::app(engine).await.unwrap()
}

fn documents(entries: Vec<(&str, Value)>) -> Documents {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

async fn seeded() -> Router {
    let mut collections = BTreeMap::new();
    collections.insert(
        Collection::Agents,
        documents(vec![
            ("a1", json!({ "agent_id": "BIGD-0001", "name": "Ana" })),
            ("a2", json!({ "agent_id": "BIGD-0002", "name": "Ben" })),
        ]),
    );
    collections.insert(
        Collection::Customers,
        documents(vec![
            (
                "c1",
                json!({ "customer_id": "CUST-0001", "name": "Acme", "agent_id": "a1", "total_spent": 10000 }),
            ),
            (
                "c2",
                json!({ "customer_id": "CUST-0002", "name": "Bolt", "agent_id": "a2", "total_spent": 500 }),
            ),
        ]),
    );
    collections.insert(
        Collection::Orders,
        documents(vec![
            (
                "o1",
                json!({ "agent_id": "a1", "customer_id": "c1", "order_date": "2024-01-15", "total_amount": 100 }),
            ),
            (
                "o2",
                json!({ "agent_id": "a2", "customer_id": "c2", "order_date": "2024-02-15", "total_amount": 200 }),
            ),
        ]),
    );
    collections.insert(
        Collection::Products,
        documents(vec![("p1", json!({ "name": "Widget", "price": 50 }))]),
    );
    app_with(collections).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    agent: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(agent) = agent {
        request = request.header("agent-id", agent);
    }
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    agent: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, agent, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn dashboard_depends_on_agent_header() {
    let app = seeded().await;

    let (status, body) = send_json(&app, "GET", "/dashboard", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "admin");
    assert_eq!(body["total_revenue"], 300.0);
    assert_eq!(body["total_agents"], 2);

    let (status, body) = send_json(&app, "GET", "/dashboard", Some("a1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "agent");
    assert_eq!(body["total_revenue"], 100.0);
    assert_eq!(body["total_customers"], 1);
}

#[tokio::test]
async fn monthly_and_top_customers() {
    let app = seeded().await;

    let (_, body) = send_json(&app, "GET", "/dashboard/monthly?year=2024", None, None).await;
    let months = body["months"].as_array().unwrap();
    assert_eq!(months.len(), 12);
    assert_eq!(months[0]["month"], "Jan");
    assert_eq!(months[1]["total"], 200.0);

    let (_, body) = send_json(&app, "GET", "/dashboard/top-customers", None, None).await;
    let customers = body["customers"].as_array().unwrap();
    assert_eq!(customers[0]["name"], "Acme");
    assert_eq!(customers[1]["name"], "Bolt");
}

#[tokio::test]
async fn reports_and_export() {
    let app = seeded().await;

    let (status, body) = send_json(&app, "GET", "/reports", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agent_performance"].as_array().unwrap().len(), 2);
    assert_eq!(body["customer_rebates"][0]["rebate"], 1000.0);

    let (status, bytes) = send(&app, "GET", "/reports/export", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let csv = String::from_utf8(bytes).unwrap();
    assert!(csv.starts_with("report,name,amount,target,percentage,purchases"));
    assert!(csv.contains("customer_rebates,Acme,1000.0"));
}

#[tokio::test]
async fn scoped_agent_is_forbidden_elsewhere() {
    let app = seeded().await;

    let (status, body) = send_json(&app, "GET", "/agents/a2/performance", Some("a1"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("Forbidden"));

    let (status, _) = send_json(&app, "GET", "/customers/c2", Some("a1"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_json(&app, "DELETE", "/agents/a2", Some("a1"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send_json(&app, "GET", "/agents/a1/performance", Some("a1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["performance"]["sales"], 100.0);
    assert_eq!(body["monthly"].as_array().unwrap().len(), 12);

    let (_, body) = send_json(&app, "GET", "/customers", Some("a1"), None).await;
    let customers = body["customers"].as_array().unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0]["agent_name"], "Ana");
}

#[tokio::test]
async fn unknown_records_are_404() {
    let app = seeded().await;
    let (status, body) = send_json(&app, "GET", "/agents/ghost", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = send_json(
        &app,
        "PATCH",
        "/orders/ghost",
        None,
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn agent_lifecycle() {
    let app = app_with_db().await;

    let (_, body) = send_json(&app, "GET", "/agents/next-code", None, None).await;
    assert_eq!(body["code"], "BIGD-0001");

    let (status, agent) = send_json(
        &app,
        "POST",
        "/agents",
        None,
        Some(json!({ "name": "Ana", "area_covered": "Cebu", "latitude": 10.3, "longitude": 123.9 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(agent["agent_id"], "BIGD-0001");
    assert_eq!(agent["status"], "active");
    assert_eq!(agent["sales_target"], 50000.0);
    let id = agent["id"].as_str().unwrap().to_string();

    let (status, updated) = send_json(
        &app,
        "PATCH",
        &format!("/agents/{id}"),
        Some(&id),
        Some(json!({ "contact": "0917" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["contact"], "0917");
    assert_eq!(updated["position"]["lat"], 10.3);

    let (status, _) = send_json(
        &app,
        "POST",
        "/agents",
        None,
        Some(json!({ "name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send_json(&app, "DELETE", &format!("/agents/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send_json(&app, "GET", &format!("/agents/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_flow_updates_customer() {
    let app = app_with_db().await;

    let (_, agent) = send_json(&app, "POST", "/agents", None, Some(json!({ "name": "Ana" }))).await;
    let agent_id = agent["id"].as_str().unwrap().to_string();

    let (status, customer) = send_json(
        &app,
        "POST",
        "/customers",
        Some(&agent_id),
        Some(json!({ "name": "Acme" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(customer["customer_id"], "CUST-0001");
    assert_eq!(customer["agent_id"], agent_id.as_str());
    let customer_id = customer["id"].as_str().unwrap().to_string();

    let (status, order) = send_json(
        &app,
        "POST",
        "/orders",
        Some(&agent_id),
        Some(json!({
            "customer_id": customer_id,
            "order_date": "2024-06-01",
            "items": [{ "product_id": "p1", "quantity": 3, "unit_price": 50 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["total_amount"], 150.0);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["customer_name"], "Acme");
    let order_id = order["id"].as_str().unwrap().to_string();

    let (_, customer) = send_json(
        &app,
        "GET",
        &format!("/customers/{customer_id}"),
        Some(&agent_id),
        None,
    )
    .await;
    assert_eq!(customer["total_spent"], 150.0);
    assert_eq!(customer["total_orders"], 1);

    let (status, _) = send_json(
        &app,
        "POST",
        "/orders",
        Some(&agent_id),
        Some(json!({ "customer_id": customer_id, "items": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, updated) = send_json(
        &app,
        "PATCH",
        &format!("/orders/{order_id}"),
        Some(&agent_id),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");

    let (status, _) = send_json(
        &app,
        "PATCH",
        &format!("/orders/{order_id}"),
        Some(&agent_id),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send_json(
        &app,
        "GET",
        &format!("/customers/{customer_id}/orders"),
        None,
        None,
    )
    .await;
    assert_eq!(body["orders"].as_array().unwrap().len(), 1);

    let (_, body) = send_json(
        &app,
        "GET",
        &format!("/agents/{agent_id}/orders"),
        Some(&agent_id),
        None,
    )
    .await;
    assert_eq!(body["orders"][0]["order_id"], order["order_id"]);
}

#[tokio::test]
async fn tracking_reflects_agent_writes() {
    let app = app_with_db().await;

    let (_, body) = send_json(&app, "GET", "/agents/tracking", None, None).await;
    assert!(body["agents"].as_array().unwrap().is_empty());

    send_json(&app, "POST", "/agents", None, Some(json!({ "name": "Ana" }))).await;

    // The tracking task catches up asynchronously.
    let mut agents = Vec::new();
    for _ in 0..50 {
        let (_, body) = send_json(&app, "GET", "/agents/tracking", None, None).await;
        agents = body["agents"].as_array().unwrap().clone();
        if !agents.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0]["activity"], "active");
    assert_eq!(agents[0]["last_seen"], "Just now");
}

#[tokio::test]
async fn products_are_listed() {
    let app = seeded().await;
    let (status, body) = send_json(&app, "GET", "/products", Some("a2"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"][0]["name"], "Widget");
    assert_eq!(body["products"][0]["price"], 50.0);
}

#[tokio::test]
async fn agents_cannot_change_their_own_target_or_status() {
    let app = seeded().await;

    let (status, body) = send_json(
        &app,
        "PATCH",
        "/agents/a1",
        Some("a1"),
        Some(json!({ "sales_target": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("Forbidden"));

    let (status, _) = send_json(
        &app,
        "PATCH",
        "/agents/a1",
        Some("a1"),
        Some(json!({ "status": "inactive" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = send_json(&app, "GET", "/reports", Some("a1"), None).await;
    let performance = &body["agent_performance"][0];
    assert_eq!(performance["target"], 50000.0);
    assert_eq!(performance["met_target"], false);

    let (status, updated) = send_json(
        &app,
        "PATCH",
        "/agents/a1",
        None,
        Some(json!({ "sales_target": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["sales_target"], 100.0);
}

#[tokio::test]
async fn agents_see_the_whole_team_on_tracking() {
    let app = seeded().await;

    let (status, body) = send_json(&app, "GET", "/agents/tracking", Some("a1"), None).await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = body["agents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|agent| agent["agent_id"].as_str().unwrap())
        .collect();
    assert_eq!(codes, ["BIGD-0001", "BIGD-0002"]);
}
