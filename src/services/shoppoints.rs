use crate::{
    entities::{category, image, shoppoint, size, Category, Image, Shoppoint, Size},
    errors::ServiceError,
};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use std::collections::HashMap;

/// Resolves the shop named in the request path
pub async fn find_shop<C: ConnectionTrait>(
    conn: &C,
    shopcode: &str,
) -> Result<shoppoint::Model, ServiceError> {
    Shoppoint::find()
        .filter(shoppoint::Column::Code.eq(shopcode))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("shoppoint", shopcode))
}

/// Category by id, only if it belongs to the shop
pub async fn find_category<C: ConnectionTrait>(
    conn: &C,
    shop_id: i32,
    category_id: i32,
) -> Result<category::Model, ServiceError> {
    Category::find_by_id(category_id)
        .filter(category::Column::ShoppointId.eq(shop_id))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("category", category_id))
}

/// Loads every requested image of the shop; the first missing id is reported
pub async fn find_images<C: ConnectionTrait>(
    conn: &C,
    shop_id: i32,
    ids: &[i32],
) -> Result<HashMap<i32, image::Model>, ServiceError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let found: HashMap<i32, image::Model> = Image::find()
        .filter(image::Column::ShoppointId.eq(shop_id))
        .filter(image::Column::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await?
        .into_iter()
        .map(|image| (image.id, image))
        .collect();

    match ids.iter().find(|id| !found.contains_key(*id)) {
        Some(missing) => Err(ServiceError::not_found("image", missing)),
        None => Ok(found),
    }
}

/// Loads every requested size of the shop; the first missing id is reported
pub async fn find_sizes<C: ConnectionTrait>(
    conn: &C,
    shop_id: i32,
    ids: &[i32],
) -> Result<HashMap<i32, size::Model>, ServiceError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let found: HashMap<i32, size::Model> = Size::find()
        .filter(size::Column::ShoppointId.eq(shop_id))
        .filter(size::Column::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await?
        .into_iter()
        .map(|size| (size.id, size))
        .collect();

    match ids.iter().find(|id| !found.contains_key(*id)) {
        Some(missing) => Err(ServiceError::not_found("size", missing)),
        None => Ok(found),
    }
}
