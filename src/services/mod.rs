pub mod codes;
pub mod products;
pub mod reconcile;
pub mod shoppoints;
pub mod sizes;

pub use codes::{CodeGenerator, TimestampCodeGenerator};
pub use products::{ProductDetail, ProductService, UpsertProductRequest};
pub use sizes::SizeService;
