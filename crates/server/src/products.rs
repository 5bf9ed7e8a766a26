use api_types::product::{ProductView, ProductsResponse};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

/// Products are shared by every agent and never scoped.
pub async fn list(State(state): State<ServerState>) -> Result<Json<ProductsResponse>, ServerError> {
    let products = state
        .engine
        .products()
        .await?
        .into_iter()
        .map(|product| ProductView {
            id: product.id,
            name: product.name,
            price: product.price,
            sku: product.sku,
        })
        .collect();

    Ok(Json(ProductsResponse { products }))
}
