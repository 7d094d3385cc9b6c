//! Shoppoint API Library
//!
//! Product catalog backend for point-of-sale and web shops, plus WeChat
//! order notifications.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod models;
pub mod notifications;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

/// Catalog routes of one shop, nested under `/api/:shopcode`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(handlers::products::products_routes())
        .merge(handlers::sizes::sizes_routes())
}

/// Full application router without CORS, which depends on deployment config
pub fn build_router(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/api/:shopcode", api_routes())
        .nest("/health", health::health_routes())
        .merge(openapi::openapi_routes())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
