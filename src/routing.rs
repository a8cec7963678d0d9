//! Application router configuration.

use axum::{
    Json,
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState, endpoints,
    seed::seed_endpoint,
    sign_in::get_sign_in_page,
    stores::{SeedStore, TransactionStore},
    transaction::{create_transaction_endpoint, list_transactions_endpoint},
};

/// Return a router with all the app's routes.
///
/// Each API route carries its own method fallback so unsupported verbs get
/// the JSON 405 body rather than an empty response.
pub fn build_router<T>(state: AppState<T>) -> Router
where
    T: TransactionStore + SeedStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint::<T>)
                .post(create_transaction_endpoint::<T>)
                .fallback(get_method_not_allowed),
        )
        .route(
            endpoints::SEED_API,
            post(seed_endpoint::<T>).fallback(get_method_not_allowed),
        )
        .route(endpoints::SIGN_IN_VIEW, get(get_sign_in_page))
        .fallback(get_not_found)
        .with_state(state)
}

async fn get_method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

async fn get_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found" })),
    )
        .into_response()
}
