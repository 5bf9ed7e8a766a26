use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use api_types::ErrorBody;
pub use server::{app, run, run_with_listener, spawn_with_listener};

mod agents;
mod customers;
mod dashboard;
mod orders;
mod products;
mod reports;
mod server;

pub mod types {
    pub mod dashboard {
        pub use api_types::dashboard::{
            Dashboard, MonthlyQuery, MonthlyResponse, MonthlyRevenue, TopCustomer,
            TopCustomersResponse,
        };
    }

    pub mod report {
        pub use api_types::report::{
            AgentDetailView, AgentPerformanceView, ProductSalesView, RebateView, ReportsResponse,
        };
    }

    pub mod agent {
        pub use api_types::agent::{
            Activity, AgentNew, AgentStatus, AgentUpdate, AgentView, AgentsResponse,
            TrackedAgentView, TrackingResponse,
        };
    }

    pub mod customer {
        pub use api_types::customer::{
            CustomerNew, CustomerStatus, CustomerUpdate, CustomerView, CustomersResponse,
        };
    }

    pub mod order {
        pub use api_types::order::{
            OrderItem, OrderNew, OrderStatus, OrderUpdate, OrderView, OrdersResponse,
        };
    }

    pub mod product {
        pub use api_types::product::{ProductView, ProductsResponse};
    }

    pub use api_types::{ErrorBody, Position, code::NextCode};
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InvalidRecord(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Export(_) | EngineError::Serialization(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Serialization(serde_err) => {
            tracing::error!("serialization error: {serde_err}");
            "internal server error".to_string()
        }
        EngineError::Export(export_err) => {
            tracing::error!("export error: {export_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
