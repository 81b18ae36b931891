use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Maintenances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Maintenances::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Maintenances::CoproId).uuid().not_null())
                    .col(ColumnDef::new(Maintenances::Title).string().not_null())
                    .col(ColumnDef::new(Maintenances::Description).text())
                    .col(
                        ColumnDef::new(Maintenances::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Maintenances::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Maintenances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Maintenances::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenances_copro_id")
                            .from(Maintenances::Table, Maintenances::CoproId)
                            .to(Copros::Table, Copros::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // アクティブ判定 (start_date <= now <= end_date) 用
        manager
            .create_index(
                Index::create()
                    .name("idx_maintenances_copro_window")
                    .table(Maintenances::Table)
                    .col(Maintenances::CoproId)
                    .col(Maintenances::StartDate)
                    .col(Maintenances::EndDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MaintenanceServiceInstances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MaintenanceServiceInstances::MaintenanceId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceServiceInstances::ServiceInstanceId)
                            .uuid()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(MaintenanceServiceInstances::MaintenanceId)
                            .col(MaintenanceServiceInstances::ServiceInstanceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_service_instances_maintenance_id")
                            .from(
                                MaintenanceServiceInstances::Table,
                                MaintenanceServiceInstances::MaintenanceId,
                            )
                            .to(Maintenances::Table, Maintenances::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_service_instances_service_instance_id")
                            .from(
                                MaintenanceServiceInstances::Table,
                                MaintenanceServiceInstances::ServiceInstanceId,
                            )
                            .to(ServiceInstances::Table, ServiceInstances::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(MaintenanceServiceInstances::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Maintenances::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Maintenances {
    Table,
    Id,
    CoproId,
    Title,
    Description,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MaintenanceServiceInstances {
    Table,
    MaintenanceId,
    ServiceInstanceId,
}

#[derive(DeriveIden)]
enum Copros {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ServiceInstances {
    Table,
    Id,
}
