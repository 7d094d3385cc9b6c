pub mod common;
pub mod products;
pub mod sizes;

use crate::{
    config::AppConfig,
    db::DbPool,
    errors::ServiceError,
    notifications::WeixinNotifier,
    services::{CodeGenerator, ProductService, SizeService},
};
use std::sync::Arc;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<ProductService>,
    pub sizes: Arc<SizeService>,
    pub weixin: Arc<WeixinNotifier>,
}

impl AppServices {
    /// Builds every service once; handlers receive them through `AppState`
    pub fn new(
        db_pool: Arc<DbPool>,
        codes: Arc<dyn CodeGenerator>,
        config: &AppConfig,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            products: Arc::new(ProductService::new(
                db_pool.clone(),
                codes,
                config.code_retry_attempts,
            )),
            sizes: Arc::new(SizeService::new(db_pool)),
            weixin: Arc::new(WeixinNotifier::from_config(&config.weixin)?),
        })
    }
}
