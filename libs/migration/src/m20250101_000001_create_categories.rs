use sea_orm_migration::{prelude::*, schema::*};

use crate::MasterSchema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(r#"CREATE SCHEMA IF NOT EXISTS "MasterSchema""#)
            .await?;

        manager
            .create_table(
                Table::create()
                    .table((MasterSchema::Schema, Categories::Table))
                    .if_not_exists()
                    .col(pk_auto(Categories::Id))
                    .col(string_len(Categories::CatName, 50))
                    .col(integer(Categories::CatOrder).default(0))
                    .col(boolean(Categories::IsDeleted).default(false))
                    .col(boolean(Categories::IsActive).default(true))
                    .col(
                        timestamp_with_time_zone(Categories::CreatedDate)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Names are unique among live categories only, ignoring case
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE UNIQUE INDEX "UX_Categories_CatName_Live"
                    ON "MasterSchema"."Categories" (lower("CatName"))
                    WHERE NOT "IsDeleted"
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table((MasterSchema::Schema, Categories::Table))
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(r#"DROP SCHEMA IF EXISTS "MasterSchema""#)
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Categories {
    #[sea_orm(iden = "Categories")]
    Table,
    #[sea_orm(iden = "Id")]
    Id,
    #[sea_orm(iden = "CatName")]
    CatName,
    #[sea_orm(iden = "CatOrder")]
    CatOrder,
    #[sea_orm(iden = "IsDeleted")]
    IsDeleted,
    #[sea_orm(iden = "IsActive")]
    IsActive,
    #[sea_orm(iden = "CreatedDate")]
    CreatedDate,
}
