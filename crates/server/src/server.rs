use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};
use tokio::sync::RwLock;

use std::{net::SocketAddr, sync::Arc};

use crate::{agents, customers, dashboard, orders, products, reports};
use engine::{Agent, AgentWatch, Engine, EngineError, Scope};

static AGENT_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("agent-id");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Agents as of the last write, kept fresh by the tracking task.
    pub tracked: Arc<RwLock<Vec<Agent>>>,
}

impl ServerState {
    /// Build the state and start the task feeding `tracked`.
    pub async fn start(engine: Arc<Engine>) -> Result<Self, EngineError> {
        let mut watch = engine.watch_agents().await?;
        let tracked = Arc::new(RwLock::new(watch.current()));
        tokio::spawn(follow_agents(watch, tracked.clone()));
        Ok(Self { engine, tracked })
    }
}

/// Replace the tracked agents on every write until the store goes away.
async fn follow_agents(mut watch: AgentWatch, tracked: Arc<RwLock<Vec<Agent>>>) {
    while let Some(agents) = watch.next().await {
        tracing::debug!("tracking {} agents", agents.len());
        *tracked.write().await = agents;
    }
    tracing::info!("agent tracking stopped");
}

/// `TypedHeader` for the acting agent.
///
/// Requests carrying an "agent-id" entry are restricted to that agent's
/// records; requests without it get the admin view.
#[derive(Debug)]
struct AgentHeader(String);

impl Header for AgentHeader {
    fn name() -> &'static axum::http::HeaderName {
        &AGENT_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };

        Ok(AgentHeader(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode agent-id header"),
        }
    }
}

async fn scope(
    agent_header: Option<TypedHeader<AgentHeader>>,
    mut request: Request,
    next: Next,
) -> Response {
    let scope = Scope::from_agent(agent_header.as_ref().map(|header| header.0.0.as_str()));
    request.extensions_mut().insert(scope);
    next.run(request).await
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/dashboard", get(dashboard::summary))
        .route("/dashboard/monthly", get(dashboard::monthly))
        .route("/dashboard/top-customers", get(dashboard::top_customers))
        .route("/reports", get(reports::get))
        .route("/reports/export", get(reports::export))
        .route("/agents", get(agents::list).post(agents::agent_new))
        .route("/agents/next-code", get(agents::next_code))
        .route("/agents/tracking", get(agents::tracking))
        .route(
            "/agents/{id}",
            get(agents::get)
                .patch(agents::update)
                .delete(agents::delete),
        )
        .route("/agents/{id}/performance", get(agents::performance))
        .route("/agents/{id}/orders", get(agents::orders))
        .route(
            "/customers",
            get(customers::list).post(customers::customer_new),
        )
        .route("/customers/next-code", get(customers::next_code))
        .route(
            "/customers/{id}",
            get(customers::get)
                .patch(customers::update)
                .delete(customers::delete),
        )
        .route("/customers/{id}/orders", get(customers::orders))
        .route("/orders", get(orders::list).post(orders::order_new))
        .route("/orders/{id}", patch(orders::update))
        .route("/products", get(products::list))
        .route_layer(middleware::from_fn(scope))
        .with_state(state)
}

/// The full application router over `engine`, with agent tracking running.
pub async fn app(engine: Engine) -> Result<Router, EngineError> {
    let state = ServerState::start(Arc::new(engine)).await?;
    Ok(router(state))
}

pub async fn run(engine: Engine, addr: SocketAddr) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    let app = app(engine).await.map_err(std::io::Error::other)?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
