use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};

use crate::models::flags::ShowAllowed;

/// Product entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub shoppoint_id: i32,

    pub category_id: i32,

    /// Business code, unique per shoppoint
    pub code: String,

    pub name: String,

    pub english_name: Option<String>,

    pub pinyin: Option<String>,

    /// Prices are integer cents
    pub price: i32,
    pub member_price: i32,
    pub promote_price: i32,

    pub stock: i32,
    pub promote_stock: i32,

    pub summary: Option<String>,

    pub note: Option<String>,

    /// Raw channel bits, see [`ShowAllowed`]
    pub show_allowed: i32,

    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn visibility(&self) -> ShowAllowed {
        ShowAllowed::from_bits(self.show_allowed)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shoppoint::Entity",
        from = "Column::ShoppointId",
        to = "super::shoppoint::Column::Id"
    )]
    Shoppoint,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::product_image::Entity")]
    Images,
    #[sea_orm(has_many = "super::product_size::Entity")]
    Sizes,
}

impl Related<super::shoppoint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shoppoint.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::product_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::product_size::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sizes.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();

        if insert {
            if let ActiveValue::NotSet = active_model.is_deleted {
                active_model.is_deleted = Set(false);
            }
            active_model.created_at = Set(now);
        }

        active_model.updated_at = Set(now);
        Ok(active_model)
    }
}
