use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_shoppoints_table::Migration),
            Box::new(m20240101_000002_create_catalog_tables::Migration),
            Box::new(m20240101_000003_create_products_table::Migration),
            Box::new(m20240101_000004_create_product_children_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_shoppoints_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_shoppoints_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Shoppoints::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Shoppoints::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Shoppoints::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Shoppoints::Name).string().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Shoppoints::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Shoppoints {
        Table,
        Id,
        Code,
        Name,
    }
}

mod m20240101_000002_create_catalog_tables {
    use super::m20240101_000001_create_shoppoints_table::Shoppoints;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductCategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductCategories::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ProductCategories::ShoppointId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductCategories::Name).string().not_null())
                        .col(
                            ColumnDef::new(ProductCategories::Index)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductCategories::ExtraInfo)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_categories_shoppoint")
                                .from(ProductCategories::Table, ProductCategories::ShoppointId)
                                .to(Shoppoints::Table, Shoppoints::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Images::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Images::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Images::ShoppointId).integer().not_null())
                        .col(ColumnDef::new(Images::Name).string().not_null())
                        .col(ColumnDef::new(Images::Title).string().null())
                        .col(ColumnDef::new(Images::Note).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_images_shoppoint")
                                .from(Images::Table, Images::ShoppointId)
                                .to(Shoppoints::Table, Shoppoints::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Sizes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Sizes::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Sizes::ShoppointId).integer().not_null())
                        .col(ColumnDef::new(Sizes::Name).string().not_null())
                        .col(ColumnDef::new(Sizes::Value).integer().not_null().default(0))
                        .col(ColumnDef::new(Sizes::Spec).string().null())
                        .col(
                            ColumnDef::new(Sizes::SharedMin)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Sizes::SharedMax)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Sizes::Utensils)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Sizes::PreOrderHours)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Sizes::Banner).string().null())
                        .col(
                            ColumnDef::new(Sizes::PricePlus)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Sizes::MemberPricePlus)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Sizes::PromotePricePlus)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Sizes::Index).integer().not_null().default(0))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sizes_shoppoint")
                                .from(Sizes::Table, Sizes::ShoppointId)
                                .to(Shoppoints::Table, Shoppoints::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Sizes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Images::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductCategories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum ProductCategories {
        Table,
        Id,
        ShoppointId,
        Name,
        Index,
        ExtraInfo,
    }

    #[derive(DeriveIden)]
    pub enum Images {
        Table,
        Id,
        ShoppointId,
        Name,
        Title,
        Note,
    }

    #[derive(DeriveIden)]
    pub enum Sizes {
        Table,
        Id,
        ShoppointId,
        Name,
        Value,
        Spec,
        SharedMin,
        SharedMax,
        Utensils,
        PreOrderHours,
        Banner,
        PricePlus,
        MemberPricePlus,
        PromotePricePlus,
        Index,
    }
}

mod m20240101_000003_create_products_table {
    use super::m20240101_000001_create_shoppoints_table::Shoppoints;
    use super::m20240101_000002_create_catalog_tables::ProductCategories;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Products::ShoppointId).integer().not_null())
                        .col(ColumnDef::new(Products::CategoryId).integer().not_null())
                        .col(ColumnDef::new(Products::Code).string().not_null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::EnglishName).string().null())
                        .col(ColumnDef::new(Products::Pinyin).string().null())
                        .col(ColumnDef::new(Products::Price).integer().not_null())
                        .col(ColumnDef::new(Products::MemberPrice).integer().not_null())
                        .col(ColumnDef::new(Products::PromotePrice).integer().not_null())
                        .col(
                            ColumnDef::new(Products::Stock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::PromoteStock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Products::Summary).string().null())
                        .col(ColumnDef::new(Products::Note).string().null())
                        .col(
                            ColumnDef::new(Products::ShowAllowed)
                                .integer()
                                .not_null()
                                .default(2),
                        )
                        .col(
                            ColumnDef::new(Products::IsDeleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_shoppoint")
                                .from(Products::Table, Products::ShoppointId)
                                .to(Shoppoints::Table, Shoppoints::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_category")
                                .from(Products::Table, Products::CategoryId)
                                .to(ProductCategories::Table, ProductCategories::Id),
                        )
                        .to_owned(),
                )
                .await?;

            // Generated codes must not collide inside one shop
            manager
                .create_index(
                    Index::create()
                        .name("idx_products_shoppoint_code")
                        .table(Products::Table)
                        .col(Products::ShoppointId)
                        .col(Products::Code)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Products {
        Table,
        Id,
        ShoppointId,
        CategoryId,
        Code,
        Name,
        EnglishName,
        Pinyin,
        Price,
        MemberPrice,
        PromotePrice,
        Stock,
        PromoteStock,
        Summary,
        Note,
        ShowAllowed,
        IsDeleted,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_product_children_tables {
    use super::m20240101_000002_create_catalog_tables::{Images, Sizes};
    use super::m20240101_000003_create_products_table::Products;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_product_children_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductImages::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductImages::ProductId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductImages::ImageId).integer().not_null())
                        .col(
                            ColumnDef::new(ProductImages::Index)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(ProductImages::Note).string().null())
                        .primary_key(
                            Index::create()
                                .col(ProductImages::ProductId)
                                .col(ProductImages::ImageId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_images_product")
                                .from(ProductImages::Table, ProductImages::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_images_image")
                                .from(ProductImages::Table, ProductImages::ImageId)
                                .to(Images::Table, Images::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductSizes::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(ProductSizes::ProductId).integer().not_null())
                        .col(ColumnDef::new(ProductSizes::SizeId).integer().not_null())
                        .col(
                            ColumnDef::new(ProductSizes::Index)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductSizes::PricePlus)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductSizes::MemberPricePlus)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductSizes::PromotePricePlus)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductSizes::Stock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductSizes::PromoteStock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductSizes::Sold)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductSizes::MemberSold)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductSizes::PromoteSold)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .primary_key(
                            Index::create()
                                .col(ProductSizes::ProductId)
                                .col(ProductSizes::SizeId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_sizes_product")
                                .from(ProductSizes::Table, ProductSizes::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_sizes_size")
                                .from(ProductSizes::Table, ProductSizes::SizeId)
                                .to(Sizes::Table, Sizes::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductSizes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductImages::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ProductImages {
        Table,
        ProductId,
        ImageId,
        Index,
        Note,
    }

    #[derive(DeriveIden)]
    enum ProductSizes {
        Table,
        ProductId,
        SizeId,
        Index,
        PricePlus,
        MemberPricePlus,
        PromotePricePlus,
        Stock,
        PromoteStock,
        Sold,
        MemberSold,
        PromoteSold,
    }
}
