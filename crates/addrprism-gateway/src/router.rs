//! Axum router wiring.
//!
//! `/health` and `/metrics` are operational; `/expand` and `/parser` are the
//! metered normalization API. `/metrics` answers any method.

use axum::{
    routing::{any, get, post},
    Router,
};

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(ops::health))
        .route(api::normalize::EXPAND_PATH, post(api::expand))
        .route(api::normalize::PARSE_PATH, post(api::parse))
        .route("/metrics", any(ops::metrics))
        .with_state(state)
}
