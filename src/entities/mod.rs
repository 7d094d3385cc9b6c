//! sea-orm entities for the shop catalog.
//!
//! `shoppoint` owns everything; `product_image` and `product_size` are join
//! rows owned by their product and reconciled on every upsert.

pub mod category;
pub mod image;
pub mod product;
pub mod product_image;
pub mod product_size;
pub mod shoppoint;
pub mod size;

pub use category::{Entity as Category, Model as CategoryModel};
pub use image::{Entity as Image, Model as ImageModel};
pub use product::{Entity as Product, Model as ProductModel};
pub use product_image::{Entity as ProductImage, Model as ProductImageModel};
pub use product_size::{Entity as ProductSize, Model as ProductSizeModel};
pub use shoppoint::{Entity as Shoppoint, Model as ShoppointModel};
pub use size::{Entity as Size, Model as SizeModel};
