use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Buildings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Buildings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Buildings::CoproId).uuid().not_null())
                    .col(ColumnDef::new(Buildings::Name).string().not_null())
                    .col(ColumnDef::new(Buildings::Description).text())
                    .col(
                        ColumnDef::new(Buildings::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Buildings::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Buildings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Buildings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // SQLite でも動くよう外部キーはテーブル定義内で宣言する
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_buildings_copro_id")
                            .from(Buildings::Table, Buildings::CoproId)
                            .to(Copros::Table, Copros::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 建物名はコプロ内で一意
        manager
            .create_index(
                Index::create()
                    .name("idx_buildings_copro_name")
                    .table(Buildings::Table)
                    .col(Buildings::CoproId)
                    .col(Buildings::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Buildings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Buildings {
    Table,
    Id,
    CoproId,
    Name,
    Description,
    IsActive,
    DisplayOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Copros {
    Table,
    Id,
}
