//! Admin API over the pool registry.

pub mod handlers;
pub mod auth;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
    middleware,
};
use crate::pool::PoolRegistry;
use self::handlers::*;
use self::auth::admin_auth_middleware;

/// State shared by admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub registry: PoolRegistry,
    pub api_key: Arc<str>,
}

impl AdminState {
    pub fn new(registry: PoolRegistry, api_key: impl Into<String>) -> Self {
        Self {
            registry,
            api_key: Arc::from(api_key.into()),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/pools", get(get_pools))
        .route("/admin/pools/{name}", get(get_pool))
        .route("/admin/pools/{name}/select", post(select_worker))
        .route("/admin/pools/{name}/connect", post(connect_pool))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}
