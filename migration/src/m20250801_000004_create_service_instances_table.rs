use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceInstances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceInstances::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceInstances::CoproId).uuid().not_null())
                    .col(
                        ColumnDef::new(ServiceInstances::BuildingId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServiceInstances::Name).string().not_null())
                    .col(ColumnDef::new(ServiceInstances::Identifier).string())
                    .col(ColumnDef::new(ServiceInstances::Description).text())
                    .col(ColumnDef::new(ServiceInstances::Location).string())
                    .col(
                        ColumnDef::new(ServiceInstances::Status)
                            .string_len(20)
                            .not_null()
                            .default("operational"),
                    )
                    .col(
                        ColumnDef::new(ServiceInstances::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ServiceInstances::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ServiceInstances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ServiceInstances::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_instances_copro_id")
                            .from(ServiceInstances::Table, ServiceInstances::CoproId)
                            .to(Copros::Table, Copros::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    // 設備が残っている建物は削除できない
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_instances_building_id")
                            .from(ServiceInstances::Table, ServiceInstances::BuildingId)
                            .to(Buildings::Table, Buildings::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 設備名はコプロ内で一意
        manager
            .create_index(
                Index::create()
                    .name("idx_service_instances_copro_name")
                    .table(ServiceInstances::Table)
                    .col(ServiceInstances::CoproId)
                    .col(ServiceInstances::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_instances_building_id")
                    .table(ServiceInstances::Table)
                    .col(ServiceInstances::BuildingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceInstances::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceInstances {
    Table,
    Id,
    CoproId,
    BuildingId,
    Name,
    Identifier,
    Description,
    Location,
    Status,
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

#[derive(DeriveIden)]
enum Buildings {
    Table,
    Id,
}
