use crate::{
    entities::{
        category, image, product, product_image, product_size, size, Category, Image, Product,
        ProductImage, ProductSize, Size,
    },
    errors::ServiceError,
    models::flags::{ShowAllowed, TerminalType},
    services::{
        codes::CodeGenerator,
        reconcile::{dedup_by_key, first_duplicate, plan_replace},
        shoppoints::{find_category, find_images, find_shop, find_sizes},
    },
};
use sea_orm::sea_query::{Expr, ExprTrait, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Image reference inside an upsert payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImageRef {
    pub id: i32,
    #[serde(default)]
    pub index: i32,
}

/// Absolute per-size prices inside an upsert payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SizePrice {
    pub id: i32,
    pub price: i32,
    pub member_price: i32,
    pub promote_price: i32,
}

/// Create-or-update payload for a product and its images and sizes
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpsertProductRequest {
    /// Code of the product to update; an unknown or absent code creates a new product
    pub code: Option<String>,
    #[validate(required)]
    pub name: Option<String>,
    pub english_name: Option<String>,
    /// Category id
    #[validate(required)]
    pub category: Option<i32>,
    #[validate(required)]
    pub price: Option<i32>,
    #[validate(required)]
    pub member_price: Option<i32>,
    #[validate(required)]
    pub promote_price: Option<i32>,
    #[serde(default)]
    pub web_allowed: bool,
    #[serde(default)]
    pub promote_allowed: bool,
    pub stock: Option<i32>,
    pub promote_stock: Option<i32>,
    pub summary: Option<String>,
    pub note: Option<String>,
    /// Complete image list; repeated ids keep their first occurrence
    #[serde(default)]
    pub images: Vec<ImageRef>,
    /// Complete size list, only read when the category carries sizes
    pub sizes: Option<Vec<SizePrice>>,
}

/// A product with everything needed to render it
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub product: product::Model,
    pub category: category::Model,
    /// Ordered by display index
    pub images: Vec<(product_image::Model, image::Model)>,
    /// Ordered by position in the last upsert
    pub sizes: Vec<(product_size::Model, size::Model)>,
}

#[derive(Debug, Clone, Copy)]
struct BasePrices {
    price: i32,
    member_price: i32,
    promote_price: i32,
}

/// Upsert payload with its required fields resolved
#[derive(Debug, Clone)]
struct ProductInput {
    code: Option<String>,
    name: String,
    english_name: Option<String>,
    category_id: i32,
    prices: BasePrices,
    visibility: ShowAllowed,
    stock: Option<i32>,
    promote_stock: Option<i32>,
    summary: Option<String>,
    note: Option<String>,
    images: Vec<ImageRef>,
    sizes: Vec<SizePrice>,
}

fn missing(field: &str) -> ServiceError {
    ServiceError::ValidationError(format!("{field} is required"))
}

impl TryFrom<UpsertProductRequest> for ProductInput {
    type Error = ServiceError;

    fn try_from(request: UpsertProductRequest) -> Result<Self, Self::Error> {
        request.validate()?;

        Ok(Self {
            code: request.code.filter(|code| !code.trim().is_empty()),
            name: request.name.ok_or_else(|| missing("name"))?,
            english_name: request.english_name,
            category_id: request.category.ok_or_else(|| missing("category"))?,
            prices: BasePrices {
                price: request.price.ok_or_else(|| missing("price"))?,
                member_price: request.member_price.ok_or_else(|| missing("member_price"))?,
                promote_price: request
                    .promote_price
                    .ok_or_else(|| missing("promote_price"))?,
            },
            visibility: ShowAllowed::for_upsert(request.web_allowed, request.promote_allowed),
            stock: request.stock,
            promote_stock: request.promote_stock,
            summary: request.summary,
            note: request.note,
            images: dedup_by_key(request.images, |image| image.id),
            sizes: request.sizes.unwrap_or_default(),
        })
    }
}

impl ProductInput {
    fn apply(&self, active: &mut product::ActiveModel, shop_id: i32) {
        active.shoppoint_id = Set(shop_id);
        active.category_id = Set(self.category_id);
        active.name = Set(self.name.clone());
        active.english_name = Set(self.english_name.clone());
        active.price = Set(self.prices.price);
        active.member_price = Set(self.prices.member_price);
        active.promote_price = Set(self.prices.promote_price);
        active.show_allowed = Set(self.visibility.bits());
        active.summary = Set(self.summary.clone());
        active.note = Set(self.note.clone());
        if let Some(stock) = self.stock {
            active.stock = Set(stock);
        }
        if let Some(promote_stock) = self.promote_stock {
            active.promote_stock = Set(promote_stock);
        }
    }
}

/// Per-size surcharge over the product's base price.
///
/// A size priced below the base falls back to the size's own default
/// surcharge, so a surcharge is never negative by construction of the payload.
pub fn surcharge(size_price: i32, base_price: i32, default_plus: i32) -> i32 {
    let delta = size_price.saturating_sub(base_price);
    if delta < 0 {
        default_plus
    } else {
        delta
    }
}

/// Product catalog operations scoped to one shop
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
    codes: Arc<dyn CodeGenerator>,
    code_retry_attempts: u32,
}

impl ProductService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        codes: Arc<dyn CodeGenerator>,
        code_retry_attempts: u32,
    ) -> Self {
        Self {
            db,
            codes,
            code_retry_attempts,
        }
    }

    /// Non-deleted product by business code
    #[instrument(skip(self))]
    pub async fn get_product(
        &self,
        shopcode: &str,
        code: &str,
    ) -> Result<ProductDetail, ServiceError> {
        let db = &*self.db;
        let shop = find_shop(db, shopcode).await?;
        let product = find_active_product(db, shop.id, code)
            .await?
            .ok_or_else(|| ServiceError::not_found("product", code))?;

        load_detail(db, product).await
    }

    /// Non-deleted products visible to `terminal`, optionally limited to a category
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        shopcode: &str,
        terminal: TerminalType,
        category_id: Option<i32>,
    ) -> Result<Vec<ProductDetail>, ServiceError> {
        let db = &*self.db;
        let shop = find_shop(db, shopcode).await?;

        let mut query = Product::find()
            .filter(product::Column::ShoppointId.eq(shop.id))
            .filter(product::Column::IsDeleted.eq(false));
        if let Some(category_id) = category_id {
            let category = find_category(db, shop.id, category_id).await?;
            query = query.filter(product::Column::CategoryId.eq(category.id));
        }

        let products = query
            .filter(visible_on(terminal))
            .order_by_asc(product::Column::Id)
            .all(db)
            .await?;

        let details = load_details(db, products).await?;

        debug!(count = details.len(), "listed products");
        Ok(details)
    }

    /// Creates or updates a product and replaces its images and sizes.
    ///
    /// A newly generated code that collides with an existing one is
    /// regenerated up to `code_retry_attempts` times before giving up with
    /// [`ServiceError::Conflict`].
    #[instrument(skip(self, request), fields(code = ?request.code))]
    pub async fn upsert_product(
        &self,
        shopcode: &str,
        request: UpsertProductRequest,
    ) -> Result<ProductDetail, ServiceError> {
        let input = ProductInput::try_from(request)?;
        let attempts = self.code_retry_attempts.max(1);

        let mut attempt = 1;
        loop {
            match self.upsert_once(shopcode, &input).await {
                Err(ServiceError::Conflict(reason)) if attempt < attempts => {
                    warn!(attempt, %reason, "generated product code collided, retrying");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn upsert_once(
        &self,
        shopcode: &str,
        input: &ProductInput,
    ) -> Result<ProductDetail, ServiceError> {
        let txn = self.db.begin().await?;

        match self.write_product(&txn, shopcode, input).await {
            Ok(detail) => {
                txn.commit().await?;
                info!(
                    product_id = detail.product.id,
                    code = %detail.product.code,
                    images = detail.images.len(),
                    sizes = detail.sizes.len(),
                    "product upserted"
                );
                Ok(detail)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(error = %rollback_err, "rollback after failed upsert did not complete");
                }
                Err(err)
            }
        }
    }

    async fn write_product(
        &self,
        txn: &DatabaseTransaction,
        shopcode: &str,
        input: &ProductInput,
    ) -> Result<ProductDetail, ServiceError> {
        let shop = find_shop(txn, shopcode).await?;
        let existing = match input.code.as_deref() {
            Some(code) => find_active_product(txn, shop.id, code).await?,
            None => None,
        };
        let category = find_category(txn, shop.id, input.category_id).await?;

        let product = match existing {
            Some(current) => {
                let mut active: product::ActiveModel = current.into();
                input.apply(&mut active, shop.id);
                active.update(txn).await?
            }
            None => {
                let code = self.codes.generate();
                let mut active = product::ActiveModel {
                    code: Set(code.clone()),
                    stock: Set(0),
                    promote_stock: Set(0),
                    ..Default::default()
                };
                input.apply(&mut active, shop.id);
                active
                    .insert(txn)
                    .await
                    .map_err(|err| code_conflict(err, &code))?
            }
        };

        replace_images(txn, shop.id, product.id, &input.images).await?;

        if category.flags().has_sizes {
            replace_sizes(txn, shop.id, &product, &input.sizes).await?;
        } else if !input.sizes.is_empty() {
            debug!(
                category_id = category.id,
                "category carries no sizes, size payload ignored"
            );
        }

        load_detail(txn, product).await
    }

    /// Soft-deletes a product; its images and sizes stay in place
    #[instrument(skip(self))]
    pub async fn delete_product(
        &self,
        shopcode: &str,
        code: &str,
    ) -> Result<ProductDetail, ServiceError> {
        let db = &*self.db;
        let shop = find_shop(db, shopcode).await?;
        let product = find_active_product(db, shop.id, code)
            .await?
            .ok_or_else(|| ServiceError::not_found("product", code))?;

        let mut active: product::ActiveModel = product.into();
        active.is_deleted = Set(true);
        let product = active.update(db).await?;

        info!(product_id = product.id, code = %product.code, "product deleted");
        load_detail(db, product).await
    }
}

/// `show_allowed & terminal != 0`, evaluated by the database
fn visible_on(terminal: TerminalType) -> SimpleExpr {
    Expr::expr(Expr::col(product::Column::ShowAllowed).bit_and(terminal.bits())).ne(0)
}

fn code_conflict(err: DbErr, code: &str) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ServiceError::Conflict(format!("product code {code} already exists"))
        }
        _ => ServiceError::DatabaseError(err),
    }
}

async fn find_active_product<C: ConnectionTrait>(
    conn: &C,
    shop_id: i32,
    code: &str,
) -> Result<Option<product::Model>, ServiceError> {
    Ok(Product::find()
        .filter(product::Column::ShoppointId.eq(shop_id))
        .filter(product::Column::Code.eq(code))
        .filter(product::Column::IsDeleted.eq(false))
        .one(conn)
        .await?)
}

fn image_row(row: product_image::Model) -> product_image::ActiveModel {
    product_image::ActiveModel {
        product_id: Set(row.product_id),
        image_id: Set(row.image_id),
        index: Set(row.index),
        note: Set(row.note),
    }
}

fn size_row(row: product_size::Model) -> product_size::ActiveModel {
    product_size::ActiveModel {
        product_id: Set(row.product_id),
        size_id: Set(row.size_id),
        index: Set(row.index),
        price_plus: Set(row.price_plus),
        member_price_plus: Set(row.member_price_plus),
        promote_price_plus: Set(row.promote_price_plus),
        stock: Set(row.stock),
        promote_stock: Set(row.promote_stock),
        sold: Set(row.sold),
        member_sold: Set(row.member_sold),
        promote_sold: Set(row.promote_sold),
    }
}

async fn replace_images<C: ConnectionTrait>(
    conn: &C,
    shop_id: i32,
    product_id: i32,
    refs: &[ImageRef],
) -> Result<(), ServiceError> {
    let ids: Vec<i32> = refs.iter().map(|r| r.id).collect();
    find_images(conn, shop_id, &ids).await?;

    let desired = refs
        .iter()
        .map(|r| product_image::Model {
            product_id,
            image_id: r.id,
            index: r.index,
            note: None,
        })
        .collect();
    let stored = ProductImage::find()
        .filter(product_image::Column::ProductId.eq(product_id))
        .all(conn)
        .await?;

    let plan = plan_replace(stored, desired, |row| row.image_id);
    debug!(
        removed = plan.removed.len(),
        added = plan.added.len(),
        changed = plan.changed.len(),
        unchanged = plan.unchanged,
        "replacing product images"
    );

    if !plan.removed.is_empty() {
        ProductImage::delete_many()
            .filter(product_image::Column::ProductId.eq(product_id))
            .filter(product_image::Column::ImageId.is_in(plan.removed))
            .exec(conn)
            .await?;
    }
    if !plan.added.is_empty() {
        ProductImage::insert_many(plan.added.into_iter().map(image_row))
            .exec_without_returning(conn)
            .await?;
    }
    for row in plan.changed {
        image_row(row).update(conn).await?;
    }

    Ok(())
}

async fn replace_sizes<C: ConnectionTrait>(
    conn: &C,
    shop_id: i32,
    product: &product::Model,
    prices: &[SizePrice],
) -> Result<(), ServiceError> {
    if let Some(id) = first_duplicate(prices, |p| p.id) {
        return Err(ServiceError::ValidationError(format!(
            "size {id} is listed more than once"
        )));
    }

    let ids: Vec<i32> = prices.iter().map(|p| p.id).collect();
    let sizes = find_sizes(conn, shop_id, &ids).await?;

    let mut desired = Vec::with_capacity(prices.len());
    for (position, requested) in prices.iter().enumerate() {
        let size = sizes
            .get(&requested.id)
            .ok_or_else(|| ServiceError::not_found("size", requested.id))?;
        desired.push(product_size::Model {
            product_id: product.id,
            size_id: size.id,
            index: i32::try_from(position).unwrap_or(i32::MAX),
            price_plus: surcharge(requested.price, product.price, size.price_plus),
            member_price_plus: surcharge(
                requested.member_price,
                product.member_price,
                size.member_price_plus,
            ),
            promote_price_plus: surcharge(
                requested.promote_price,
                product.promote_price,
                size.promote_price_plus,
            ),
            stock: 0,
            promote_stock: 0,
            sold: 0,
            member_sold: 0,
            promote_sold: 0,
        });
    }

    let stored = ProductSize::find()
        .filter(product_size::Column::ProductId.eq(product.id))
        .all(conn)
        .await?;

    let plan = plan_replace(stored, desired, |row| row.size_id);
    debug!(
        removed = plan.removed.len(),
        added = plan.added.len(),
        changed = plan.changed.len(),
        unchanged = plan.unchanged,
        "replacing product sizes"
    );

    if !plan.removed.is_empty() {
        ProductSize::delete_many()
            .filter(product_size::Column::ProductId.eq(product.id))
            .filter(product_size::Column::SizeId.is_in(plan.removed))
            .exec(conn)
            .await?;
    }
    if !plan.added.is_empty() {
        ProductSize::insert_many(plan.added.into_iter().map(size_row))
            .exec_without_returning(conn)
            .await?;
    }
    for row in plan.changed {
        size_row(row).update(conn).await?;
    }

    Ok(())
}

/// Loads category, images and sizes of `product`
pub async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    product: product::Model,
) -> Result<ProductDetail, ServiceError> {
    let product_id = product.id;
    load_details(conn, vec![product])
        .await?
        .pop()
        .ok_or_else(|| ServiceError::not_found("product", product_id))
}

/// Same as [`load_detail`] for many products, with one query per related table
pub async fn load_details<C: ConnectionTrait>(
    conn: &C,
    products: Vec<product::Model>,
) -> Result<Vec<ProductDetail>, ServiceError> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    let category_ids: HashSet<i32> = products.iter().map(|p| p.category_id).collect();

    let categories: HashMap<i32, category::Model> = Category::find()
        .filter(category::Column::Id.is_in(category_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|category| (category.id, category))
        .collect();

    let mut images: HashMap<i32, Vec<(product_image::Model, image::Model)>> = HashMap::new();
    for (link, image) in ProductImage::find()
        .filter(product_image::Column::ProductId.is_in(product_ids.clone()))
        .order_by_asc(product_image::Column::Index)
        .find_also_related(Image)
        .all(conn)
        .await?
    {
        if let Some(image) = image {
            images.entry(link.product_id).or_default().push((link, image));
        }
    }

    let mut sizes: HashMap<i32, Vec<(product_size::Model, size::Model)>> = HashMap::new();
    for (link, size) in ProductSize::find()
        .filter(product_size::Column::ProductId.is_in(product_ids))
        .order_by_asc(product_size::Column::Index)
        .find_also_related(Size)
        .all(conn)
        .await?
    {
        if let Some(size) = size {
            sizes.entry(link.product_id).or_default().push((link, size));
        }
    }

    products
        .into_iter()
        .map(|product| {
            let category = categories
                .get(&product.category_id)
                .cloned()
                .ok_or_else(|| ServiceError::not_found("category", product.category_id))?;
            let images = images.remove(&product.id).unwrap_or_default();
            let sizes = sizes.remove(&product.id).unwrap_or_default();

            Ok(ProductDetail {
                product,
                category,
                images,
                sizes,
            })
        })
        .collect()
}
