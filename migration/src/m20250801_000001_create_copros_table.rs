use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Copros::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Copros::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Copros::Name).string().not_null())
                    .col(ColumnDef::new(Copros::Address).text())
                    .col(ColumnDef::new(Copros::City).string())
                    .col(ColumnDef::new(Copros::PostalCode).string_len(16))
                    .col(
                        ColumnDef::new(Copros::Country)
                            .string()
                            .not_null()
                            .default("France"),
                    )
                    .col(
                        ColumnDef::new(Copros::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Copros::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Copros::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // アクティブなコプロの検索用
        manager
            .create_index(
                Index::create()
                    .name("idx_copros_is_active")
                    .table(Copros::Table)
                    .col(Copros::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Copros::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Copros {
    Table,
    Id,
    Name,
    Address,
    City,
    PostalCode,
    Country,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
