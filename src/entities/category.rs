use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::flags::CategoryFlags;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "product_categories")]
#[schema(as = Category)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub shoppoint_id: i32,
    pub name: String,
    pub index: i32,
    /// Raw capability bits, see [`CategoryFlags`]
    pub extra_info: i32,
}

impl Model {
    pub fn flags(&self) -> CategoryFlags {
        CategoryFlags::from_bits(self.extra_info)
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
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::shoppoint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shoppoint.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
