#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    Router,
};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use shoppoint_api::{
    build_router,
    config::AppConfig,
    db::{self, DbConfig},
    entities::{category, image, shoppoint, size},
    handlers::AppServices,
    services::{CodeGenerator, ProductService, TimestampCodeGenerator},
    AppState,
};
use tower::ServiceExt;

/// Hands out queued codes, repeating the last one once the queue runs dry
pub struct QueuedCodes {
    codes: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl QueuedCodes {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            last: Mutex::new(codes.last().map(|c| c.to_string()).unwrap_or_default()),
        }
    }
}

impl CodeGenerator for QueuedCodes {
    fn generate(&self) -> String {
        match self.codes.lock().unwrap().pop_front() {
            Some(code) => {
                *self.last.lock().unwrap() = code.clone();
                code
            }
            None => self.last.lock().unwrap().clone(),
        }
    }
}

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_codes(Arc::new(TimestampCodeGenerator)).await
    }

    /// Test application whose new products take their codes from `codes`
    pub async fn with_codes(codes: Arc<dyn CodeGenerator>) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // A single connection keeps the in-memory database alive and shared
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_with_config(&DbConfig::from(&cfg))
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db = Arc::new(pool);
        let services =
            AppServices::new(db.clone(), codes, &cfg).expect("failed to build services");
        let state = AppState {
            db,
            config: cfg,
            services,
        };

        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    pub fn products(&self) -> Arc<ProductService> {
        self.state.services.products.clone()
    }

    /// Send a request against the router
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn seed_shop(&self, code: &str) -> shoppoint::Model {
        shoppoint::ActiveModel {
            code: Set(code.to_string()),
            name: Set(format!("Shop {code}")),
            ..Default::default()
        }
        .insert(&*self.state.db)
        .await
        .expect("seed shop")
    }

    pub async fn seed_category(&self, shop_id: i32, name: &str, extra_info: i32) -> category::Model {
        category::ActiveModel {
            shoppoint_id: Set(shop_id),
            name: Set(name.to_string()),
            index: Set(0),
            extra_info: Set(extra_info),
            ..Default::default()
        }
        .insert(&*self.state.db)
        .await
        .expect("seed category")
    }

    pub async fn seed_image(&self, shop_id: i32, name: &str) -> image::Model {
        image::ActiveModel {
            shoppoint_id: Set(shop_id),
            name: Set(name.to_string()),
            title: Set(None),
            note: Set(None),
            ..Default::default()
        }
        .insert(&*self.state.db)
        .await
        .expect("seed image")
    }

    /// Size with the given default surcharges (price, member, promote)
    pub async fn seed_size(
        &self,
        shop_id: i32,
        name: &str,
        index: i32,
        defaults: (i32, i32, i32),
    ) -> size::Model {
        size::ActiveModel {
            shoppoint_id: Set(shop_id),
            name: Set(name.to_string()),
            value: Set(0),
            spec: Set(None),
            shared_min: Set(0),
            shared_max: Set(0),
            utensils: Set(0),
            pre_order_hours: Set(0),
            banner: Set(None),
            price_plus: Set(defaults.0),
            member_price_plus: Set(defaults.1),
            promote_price_plus: Set(defaults.2),
            index: Set(index),
            ..Default::default()
        }
        .insert(&*self.state.db)
        .await
        .expect("seed size")
    }
}

/// Reads a response body as JSON
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}
