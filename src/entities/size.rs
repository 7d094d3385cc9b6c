use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reusable size definition; the `*_plus` columns are the default surcharges
/// used when a product's own size price would undercut its base price
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "sizes")]
#[schema(as = Size)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub shoppoint_id: i32,
    pub name: String,
    pub value: i32,
    pub spec: Option<String>,
    pub shared_min: i32,
    pub shared_max: i32,
    pub utensils: i32,
    pub pre_order_hours: i32,
    pub banner: Option<String>,
    pub price_plus: i32,
    pub member_price_plus: i32,
    pub promote_price_plus: i32,
    pub index: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shoppoint::Entity",
        from = "Column::ShoppointId",
        to = "super::shoppoint::Column::Id"
    )]
    Shoppoint,
    #[sea_orm(has_many = "super::product_size::Entity")]
    ProductSizes,
}

impl Related<super::shoppoint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shoppoint.def()
    }
}

impl Related<super::product_size::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductSizes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
