pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod store;

use axum::{Router, middleware, routing::get};
use std::sync::Arc;

use crate::state::AppState;

// Full application router: entity routes behind the admission gate, with
// request logging outermost so rejections are logged too
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route(
            "/api/testcases",
            get(handlers::list_test_cases).post(handlers::create_test_case),
        )
        .route(
            "/api/testcases/{id}",
            get(handlers::get_test_case)
                .put(handlers::update_test_case)
                .patch(handlers::patch_test_case)
                .delete(handlers::delete_test_case),
        )
        .route(
            "/api/testruns",
            get(handlers::list_test_runs).post(handlers::create_test_run),
        )
        .route(
            "/api/testruns/{id}",
            get(handlers::get_test_run)
                .put(handlers::update_test_run)
                .patch(handlers::patch_test_run)
                .delete(handlers::delete_test_run),
        )
        .route(
            "/api/defects",
            get(handlers::list_defects).post(handlers::create_defect),
        )
        .route(
            "/api/defects/{id}",
            get(handlers::get_defect)
                .put(handlers::update_defect)
                .patch(handlers::patch_defect)
                .delete(handlers::delete_defect),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gate::admission,
        ))
        .layer(middleware::from_fn(logging::log_requests))
        .with_state(state)
}
