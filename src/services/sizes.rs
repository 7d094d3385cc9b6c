use crate::{
    entities::{size, Size},
    errors::ServiceError,
    services::shoppoints::find_shop,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Read access to the size definitions of a shop
#[derive(Clone)]
pub struct SizeService {
    db: Arc<DatabaseConnection>,
}

impl SizeService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Sizes of the shop ordered by their display index
    #[instrument(skip(self))]
    pub async fn list_sizes(&self, shopcode: &str) -> Result<Vec<size::Model>, ServiceError> {
        let db = &*self.db;
        let shop = find_shop(db, shopcode).await?;

        let sizes = Size::find()
            .filter(size::Column::ShoppointId.eq(shop.id))
            .order_by_asc(size::Column::Index)
            .order_by_asc(size::Column::Id)
            .all(db)
            .await?;

        debug!(count = sizes.len(), "listed sizes");
        Ok(sizes)
    }
}
