use axum::Router;

use backend_application::AppState;

use crate::handlers::{
    account_handlers, case_handlers, inventory_handlers, opening_handlers, ops_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/auth/register",
            axum::routing::post(account_handlers::register),
        )
        .route("/v1/auth/login", axum::routing::post(account_handlers::login))
        .route(
            "/v1/auth/logout",
            axum::routing::post(account_handlers::logout),
        )
        .route(
            "/v1/auth/me",
            axum::routing::get(account_handlers::current_account),
        )
        .route("/v1/cases", axum::routing::get(case_handlers::list_cases))
        .route(
            "/v1/cases/:url_name",
            axum::routing::get(case_handlers::get_case),
        )
        .route(
            "/v1/cases/:url_name/open",
            axum::routing::post(opening_handlers::open_case),
        )
        .route(
            "/v1/inventory",
            axum::routing::get(inventory_handlers::list_inventory),
        )
        .route(
            "/v1/inventory/:item_id/sell",
            axum::routing::post(inventory_handlers::sell_item),
        )
        .route(
            "/v1/inventory/:item_id/upgrade",
            axum::routing::post(inventory_handlers::upgrade_item),
        )
        .route(
            "/v1/openings",
            axum::routing::get(opening_handlers::list_openings),
        )
        .route(
            "/v1/admin/openings/:opening_id/verify",
            axum::routing::get(opening_handlers::verify_opening),
        )
        .route(
            "/v1/admin/cases",
            axum::routing::put(case_handlers::upsert_cases),
        )
        .route(
            "/v1/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/v1/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/v1/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
