use sea_orm_migration::{prelude::*, schema::*};

use crate::MasterSchema;
use crate::m20250101_000001_create_categories::Categories;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table((MasterSchema::Schema, Products::Table))
                    .if_not_exists()
                    .col(pk_auto(Products::Id))
                    .col(string_len(Products::Title, 50))
                    .col(string_len_null(Products::Description, 250))
                    .col(string_len(Products::Author, 50))
                    .col(decimal_len(Products::BookPrice, 18, 2))
                    .col(integer(Products::CategoryId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("FK_Products_Categories_CategoryId")
                            .from((MasterSchema::Schema, Products::Table), Products::CategoryId)
                            .to((MasterSchema::Schema, Categories::Table), Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("IX_Products_CategoryId")
                    .table((MasterSchema::Schema, Products::Table))
                    .col(Products::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("IX_Products_Title")
                    .table((MasterSchema::Schema, Products::Table))
                    .col(Products::Title)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table((MasterSchema::Schema, Products::Table))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Products {
    #[sea_orm(iden = "Products")]
    Table,
    #[sea_orm(iden = "Id")]
    Id,
    #[sea_orm(iden = "Title")]
    Title,
    #[sea_orm(iden = "Description")]
    Description,
    #[sea_orm(iden = "Author")]
    Author,
    #[sea_orm(iden = "BookPrice")]
    BookPrice,
    #[sea_orm(iden = "CategoryId")]
    CategoryId,
}
