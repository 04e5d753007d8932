use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    customers::{
        dto::{CustomerView, UpdateCustomerRequest},
        services,
    },
    error::AppError,
    state::AppState,
};

pub fn customer_routes() -> Router<AppState> {
    Router::new().route("/customers/:id", get(get_customer).put(update_customer))
}

#[instrument(skip(state))]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CustomerView>, AppError> {
    let view = services::get_customer(state.customers.as_ref(), id).await?;
    Ok(Json(view))
}

#[instrument(skip(state, payload))]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerView>, AppError> {
    let view =
        services::update_customer(state.customers.as_ref(), &state.passwords, id, payload).await?;
    Ok(Json(view))
}
